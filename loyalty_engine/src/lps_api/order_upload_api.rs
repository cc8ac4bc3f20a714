//! Accepts order numbers from users.

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderNumber, UserId},
    lps_api::errors::OrderUploadError,
    traits::{InsertOrderResult, OrderManagement},
};

/// The successful outcomes of an upload.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The order is new, and has been stored with status `NEW`.
    Accepted(Order),
    /// The user had already uploaded this order. Nothing changed.
    AlreadyUploaded(Order),
}

impl UploadOutcome {
    pub fn order(&self) -> &Order {
        match self {
            Self::Accepted(o) | Self::AlreadyUploaded(o) => o,
        }
    }
}

pub struct OrderUploadApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderUploadApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderUploadApi ({:?})", self.db)
    }
}

impl<B> OrderUploadApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers `number` as an order of `owner`.
    ///
    /// Order numbers must pass the Luhn check, and belong to exactly one user forever. Uploading the same number twice
    /// is harmless for its owner, but an error for anyone else. A lost race against a concurrent upload of the same
    /// number resolves to one of these outcomes too.
    pub async fn upload_order(&self, owner: &UserId, number: &str) -> Result<UploadOutcome, OrderUploadError> {
        let number = OrderNumber::new(number).map_err(|e| {
            debug!("📦️ User {owner} uploaded an invalid order number. {e}");
            e
        })?;
        if let Some(existing) = self.db.fetch_order_by_number(&number).await? {
            return resolve_existing(owner, existing);
        }
        match self.db.insert_order(NewOrder::new(number.clone(), owner.clone())).await? {
            InsertOrderResult::Inserted(order) => {
                info!("📦️ Order {} uploaded by user {owner}", order.number);
                Ok(UploadOutcome::Accepted(order))
            },
            InsertOrderResult::AlreadyExists => {
                debug!("📦️ Order {number} was uploaded concurrently. Checking who won.");
                let existing = self.db.fetch_order_by_number(&number).await?.ok_or_else(|| {
                    OrderUploadError::DatabaseError(format!("Order {number} exists, but could not be read back"))
                })?;
                resolve_existing(owner, existing)
            },
        }
    }

    /// All the orders uploaded by `owner`, most recent first.
    pub async fn orders_for_user(&self, owner: &UserId) -> Result<Vec<Order>, OrderUploadError> {
        let orders = self.db.fetch_orders_for_user(owner).await?;
        trace!("📦️ User {owner} has {} orders", orders.len());
        Ok(orders)
    }
}

fn resolve_existing(owner: &UserId, existing: Order) -> Result<UploadOutcome, OrderUploadError> {
    if &existing.owner_id == owner {
        debug!("📦️ Order {} was already uploaded by user {owner}", existing.number);
        Ok(UploadOutcome::AlreadyUploaded(existing))
    } else {
        info!("📦️ User {owner} tried to upload order {}, which belongs to another user", existing.number);
        Err(OrderUploadError::OwnedByAnotherUser(existing.number))
    }
}
