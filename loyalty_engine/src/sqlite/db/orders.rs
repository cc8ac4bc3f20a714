use log::{debug, trace};
use lps_common::Points;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderNumber, OrderStatusType, UserId},
    traits::{AccrualUpdate, InsertOrderResult, OrderManagementError},
};

/// Inserts a new order, unless an order with the same number already exists, in which case the stored order is left
/// untouched and `AlreadyExists` is returned. The uniqueness check and the insert are a single statement, so two
/// concurrent uploads of the same number can never both succeed.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, OrderManagementError> {
    let inserted: Vec<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (number, owner_id, status, accrual, uploaded_at)
            VALUES ($1, $2, 'NEW', 0, $3)
            ON CONFLICT (number) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(&order.number)
    .bind(&order.owner_id)
    .bind(order.uploaded_at)
    .fetch_all(conn)
    .await?;
    let result = match inserted.into_iter().next() {
        Some(order) => {
            trace!("🗃️ Order {} inserted for user {}", order.number, order.owner_id);
            InsertOrderResult::Inserted(order)
        },
        None => {
            trace!("🗃️ Order {} already exists. Nothing was inserted", order.number);
            InsertOrderResult::AlreadyExists
        },
    };
    Ok(result)
}

pub async fn fetch_order_by_number(
    number: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderManagementError> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE number = $1").bind(number).fetch_all(conn).await?;
    Ok(orders.into_iter().next())
}

/// Fetches all orders for the user, most recently uploaded first.
pub async fn fetch_orders_for_user(
    user: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, OrderManagementError> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE owner_id = $1 ORDER BY uploaded_at DESC, rowid DESC")
        .bind(user)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Fetches orders with the given statuses, oldest uploads first.
pub async fn fetch_orders_with_status(
    statuses: &[OrderStatusType],
    limit: Option<u32>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, OrderManagementError> {
    if statuses.is_empty() {
        return Ok(vec![]);
    }
    let mut builder = QueryBuilder::new("SELECT * FROM orders WHERE status IN (");
    let mut in_clause = builder.separated(", ");
    for status in statuses {
        in_clause.push_bind(status.as_str());
    }
    builder.push(") ORDER BY uploaded_at ASC, rowid ASC");
    if let Some(limit) = limit {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
    }
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ {} orders with status in {statuses:?}", orders.len());
    Ok(orders)
}

/// Moves the order to `update.status` and sets its accrual, but only if its current status is one of the legal
/// predecessors of the new status. Returns the updated order, or `None` if the update was refused (unknown order,
/// terminal order, backward or repeated transition).
///
/// The accrual is only kept for `PROCESSED` orders. Any other status stores zero.
pub async fn update_order_status(
    update: &AccrualUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderManagementError> {
    let predecessors = update.status.predecessors();
    if predecessors.is_empty() {
        return Ok(None);
    }
    let accrual = match update.status {
        OrderStatusType::Processed => update.accrual,
        _ => Points::ZERO,
    };
    let mut builder = QueryBuilder::new("UPDATE orders SET status = ");
    builder.push_bind(update.status.as_str());
    builder.push(", accrual = ");
    builder.push_bind(accrual);
    builder.push(", updated_at = CURRENT_TIMESTAMP WHERE number = ");
    builder.push_bind(&update.number);
    builder.push(" AND status IN (");
    let mut in_clause = builder.separated(", ");
    for status in predecessors {
        in_clause.push_bind(status.as_str());
    }
    builder.push(") RETURNING *");
    let order = builder.build_query_as::<Order>().fetch_all(conn).await?.into_iter().next();
    match &order {
        Some(o) => debug!("🗃️ Order {} moved to {} with accrual {}", o.number, o.status, o.accrual),
        None => trace!("🗃️ Order {} was not moved to {}. Transition not allowed", update.number, update.status),
    }
    Ok(order)
}
