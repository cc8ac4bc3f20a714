use actix_web::{http::StatusCode, web, web::ServiceConfig};
use loyalty_engine::{
    db_types::{Account, OrderNumber, UserId, Withdrawal},
    traits::AccountApiError,
    BalanceApi,
};
use lps_common::Points;

use super::{
    helpers::{get_request, post_json, post_text, timestamp},
    mocks::MockAccountManager,
};
use crate::routes::{MyBalanceRoute, MyWithdrawalsRoute, OpenAccountRoute, WithdrawRoute};

const WITHDRAW: &str = "/user/balance/withdraw";

fn account(user: &str, current: i64, withdrawn: i64) -> Account {
    Account {
        user_id: UserId::from(user),
        current_balance: Points::from_hundredths(current),
        withdrawn: Points::from_hundredths(withdrawn),
        created_at: timestamp(1, 9),
        updated_at: timestamp(2, 9),
    }
}

fn withdrawal(id: i64, user: &str, order: &str, sum: i64, day: u32) -> Withdrawal {
    Withdrawal {
        id,
        user_id: UserId::from(user),
        order_number: OrderNumber::new(order).unwrap(),
        sum: Points::from_hundredths(sum),
        processed_at: timestamp(day, 10),
    }
}

fn routes(cfg: &mut ServiceConfig, accounts: MockAccountManager) {
    cfg.service(OpenAccountRoute::<MockAccountManager>::new())
        .service(MyBalanceRoute::<MockAccountManager>::new())
        .service(WithdrawRoute::<MockAccountManager>::new())
        .service(MyWithdrawalsRoute::<MockAccountManager>::new())
        .app_data(web::Data::new(BalanceApi::new(accounts)));
}

#[actix_web::test]
async fn open_account() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_create_account().times(1).returning(|user| Ok(account(user.as_str(), 0, 0)));
    let (status, body) = post_text(Some("alice"), "/user/account", "", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"current":0.0,"withdrawn":0.0}"#);
}

#[actix_web::test]
async fn fetch_my_balance() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_account().returning(|user| Ok(Some(account(user.as_str(), 50050, 4200))));
    let (status, body) = get_request(Some("alice"), "/user/balance", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"current":500.5,"withdrawn":42.0}"#);
}

#[actix_web::test]
async fn fetch_balance_without_account() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_account().returning(|_| Ok(None));
    let (status, _) = get_request(Some("nobody"), "/user/balance", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn fetch_balance_without_user() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_account().never();
    let (status, _) = get_request(None, "/user/balance", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn withdraw() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_record_withdrawal().times(1).returning(|w| {
        assert_eq!(w.user_id.as_str(), "alice");
        assert_eq!(w.order_number.as_str(), "2377225624");
        assert_eq!(w.sum, Points::from_points(751));
        Ok((account("alice", 24900, 75100), withdrawal(1, "alice", "2377225624", 75100, 5)))
    });
    let request = r#"{"order":"2377225624","sum":751}"#;
    let (status, body) = post_json(Some("alice"), WITHDRAW, request, |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"order":"2377225624","sum":751.0,"processed_at":"2024-03-05T10:30:00Z"}"#);
}

#[actix_web::test]
async fn withdraw_more_than_balance() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_record_withdrawal().times(1).returning(|_| Err(AccountApiError::InsufficientFunds));
    let request = r#"{"order":"2377225624","sum":50.01}"#;
    let (status, body) = post_json(Some("alice"), WITHDRAW, request, |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body, r#"{"error":"Insufficient funds"}"#);
}

#[actix_web::test]
async fn withdraw_without_account() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts
        .expect_record_withdrawal()
        .returning(|w| Err(AccountApiError::AccountNotFound(w.user_id.clone())));
    let request = r#"{"order":"2377225624","sum":1}"#;
    let (status, _) = post_json(Some("nobody"), WITHDRAW, request, |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn withdraw_for_invalid_order_number() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_record_withdrawal().never();
    let request = r#"{"order":"2377225625","sum":1}"#;
    let (status, _) = post_json(Some("alice"), WITHDRAW, request, |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn withdraw_bad_amounts() {
    let _ = env_logger::try_init().ok();
    for body in [r#"{"order":"2377225624","sum":0}"#, r#"{"order":"2377225624","sum":-5}"#, r#"{"order":"2377225624"}"#]
    {
        let mut accounts = MockAccountManager::new();
        accounts.expect_record_withdrawal().never();
        let (status, _) = post_json(Some("alice"), WITHDRAW, body, |cfg| routes(cfg, accounts)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[actix_web::test]
async fn withdraw_malformed_body() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_record_withdrawal().never();
    let (status, body) = post_json(Some("alice"), WITHDRAW, "order=2377225624", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body"#));
}

#[actix_web::test]
async fn fetch_my_withdrawals() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_withdrawals_for_user().returning(|user| {
        Ok(vec![
            withdrawal(2, user.as_str(), "12345678903", 1000, 6),
            withdrawal(1, user.as_str(), "2377225624", 50, 5),
        ])
    });
    let (status, body) = get_request(Some("alice"), "/user/withdrawals", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"[{"order":"12345678903","sum":10.0,"processed_at":"2024-03-06T10:30:00Z"},{"order":"2377225624","sum":0.5,"processed_at":"2024-03-05T10:30:00Z"}]"#
    );
}

#[actix_web::test]
async fn fetch_my_withdrawals_when_there_are_none() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_withdrawals_for_user().returning(|_| Ok(vec![]));
    let (status, body) = get_request(Some("alice"), "/user/withdrawals", |cfg| routes(cfg, accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
