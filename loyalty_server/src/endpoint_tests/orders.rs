use actix_web::{http::StatusCode, web, web::ServiceConfig};
use loyalty_engine::{
    db_types::{Order, OrderNumber, OrderStatusType, UserId},
    traits::{InsertOrderResult, OrderManagementError},
    OrderUploadApi,
};
use lps_common::Points;

use super::{
    helpers::{get_request, post_text, timestamp},
    mocks::MockOrderManager,
};
use crate::routes::{MyOrdersRoute, UploadOrderRoute};

fn order(number: &str, owner: &str, status: OrderStatusType, accrual: Points, day: u32) -> Order {
    Order {
        number: OrderNumber::new(number).unwrap(),
        owner_id: UserId::from(owner),
        status,
        accrual,
        uploaded_at: timestamp(day, 12),
        created_at: timestamp(day, 12),
        updated_at: timestamp(day, 13),
    }
}

fn routes(cfg: &mut ServiceConfig, orders: MockOrderManager) {
    cfg.service(UploadOrderRoute::<MockOrderManager>::new())
        .service(MyOrdersRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderUploadApi::new(orders)));
}

#[actix_web::test]
async fn upload_new_order() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order_by_number().times(1).returning(|_| Ok(None));
    orders.expect_insert_order().times(1).returning(|o| {
        assert_eq!(o.number.as_str(), "12345678903");
        assert_eq!(o.owner_id.as_str(), "alice");
        Ok(InsertOrderResult::Inserted(order("12345678903", "alice", OrderStatusType::New, Points::ZERO, 1)))
    });
    let (status, body) = post_text(Some("alice"), "/user/orders", "12345678903\n", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, r#"{"number":"12345678903","status":"NEW","uploaded_at":"2024-03-01T12:30:00Z"}"#);
}

#[actix_web::test]
async fn upload_own_order_again() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order_by_number().returning(|_| {
        Ok(Some(order("12345678903", "alice", OrderStatusType::Processing, Points::ZERO, 1)))
    });
    orders.expect_insert_order().never();
    let (status, _) = post_text(Some("alice"), "/user/orders", "12345678903", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn upload_someone_elses_order() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_order_by_number()
        .returning(|_| Ok(Some(order("79927398713", "alice", OrderStatusType::New, Points::ZERO, 1))));
    orders.expect_insert_order().never();
    let (status, body) = post_text(Some("bob"), "/user/orders", "79927398713", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"Order 79927398713 has already been uploaded by another user"}"#);
}

#[actix_web::test]
async fn upload_invalid_order_number() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order_by_number().never();
    orders.expect_insert_order().never();
    let (status, _) = post_text(Some("alice"), "/user/orders", "12345678904", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn upload_empty_body() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_insert_order().never();
    let (status, _) = post_text(Some("alice"), "/user/orders", "  \n", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn upload_without_user() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_insert_order().never();
    let (status, body) = post_text(None, "/user/orders", "12345678903", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"The user id header is missing or empty"}"#);
}

#[actix_web::test]
async fn upload_with_broken_database() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_order_by_number()
        .returning(|_| Err(OrderManagementError::DatabaseError("disk I/O error".into())));
    let (status, body) = post_text(Some("alice"), "/user/orders", "12345678903", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("disk I/O"));
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_user().times(1).returning(|user| {
        assert_eq!(user.as_str(), "alice");
        Ok(vec![
            order("2377225624", "alice", OrderStatusType::Processed, Points::from_hundredths(72998), 3),
            order("79927398713", "alice", OrderStatusType::Invalid, Points::ZERO, 2),
            order("12345678903", "alice", OrderStatusType::Processing, Points::ZERO, 1),
        ])
    });
    let (status, body) = get_request(Some("alice"), "/user/orders", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"[{"number":"2377225624","status":"PROCESSED","accrual":729.98,"uploaded_at":"2024-03-03T12:30:00Z"},{"number":"79927398713","status":"INVALID","uploaded_at":"2024-03-02T12:30:00Z"},{"number":"12345678903","status":"PROCESSING","uploaded_at":"2024-03-01T12:30:00Z"}]"#
    );
}

#[actix_web::test]
async fn fetch_my_orders_when_there_are_none() {
    let _ = env_logger::try_init().ok();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_user().returning(|_| Ok(vec![]));
    let (status, body) = get_request(Some("carol"), "/user/orders", |cfg| routes(cfg, orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
