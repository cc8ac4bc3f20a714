//! Request handler definitions
//!
//! Define each route and its handler here. Business rules live in the engine APIs; handlers only extract the user,
//! translate the request body, and map the result onto a response. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (in practice, every database call) must be awaited, never
//! blocked on.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use loyalty_engine::{
    traits::{AccountManagement, OrderManagement, WithdrawalLedger},
    BalanceApi,
    OrderUploadApi,
    UploadOutcome,
};

use crate::{
    auth::AuthenticatedUser,
    data_objects::{BalanceResponse, OrderResponse, WithdrawRequest, WithdrawalResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(upload_order => Post "/user/orders" impl OrderManagement);
/// Route handler for order uploads
///
/// The body is the bare order number, as plain text. A newly registered order is answered with `202 Accepted`, since
/// its accrual is only known later. Re-uploading one of your own orders is answered with `200 OK`.
pub async fn upload_order<B: OrderManagement>(
    user: AuthenticatedUser,
    body: String,
    api: web::Data<OrderUploadApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let number = body.trim();
    debug!("💻️ POST order {number} for user {}", user.user_id());
    if number.is_empty() {
        return Err(ServerError::InvalidRequestBody("The order number is missing".into()));
    }
    match api.upload_order(user.user_id(), number).await? {
        UploadOutcome::Accepted(order) => Ok(HttpResponse::Accepted().json(OrderResponse::from(order))),
        UploadOutcome::AlreadyUploaded(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
    }
}

route!(my_orders => Get "/user/orders" impl OrderManagement);
/// Route handler for listing the user's orders, most recently uploaded first
pub async fn my_orders<B: OrderManagement>(
    user: AuthenticatedUser,
    api: web::Data<OrderUploadApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for {}", user.user_id());
    let orders = api.orders_for_user(user.user_id()).await?;
    let orders = orders.into_iter().map(OrderResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Balance  ----------------------------------------------------

route!(open_account => Post "/user/account" impl AccountManagement, WithdrawalLedger);
/// Route handler for opening a points account. Opening an account that already exists returns it unchanged.
pub async fn open_account<B: AccountManagement + WithdrawalLedger>(
    user: AuthenticatedUser,
    api: web::Data<BalanceApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST open_account for {}", user.user_id());
    let account = api.open_account(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse::from(account)))
}

route!(my_balance => Get "/user/balance" impl AccountManagement, WithdrawalLedger);
pub async fn my_balance<B: AccountManagement + WithdrawalLedger>(
    user: AuthenticatedUser,
    api: web::Data<BalanceApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_balance for {}", user.user_id());
    let account = api.balance(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse::from(account)))
}

route!(withdraw => Post "/user/balance/withdraw" impl AccountManagement, WithdrawalLedger);
/// Route handler for spending points
///
/// The body is a JSON object, `{"order": "2377225624", "sum": 751}`. The order number must pass the Luhn check, but
/// does not have to be one of the user's uploaded orders.
pub async fn withdraw<B: AccountManagement + WithdrawalLedger>(
    user: AuthenticatedUser,
    body: web::Json<WithdrawRequest>,
    api: web::Data<BalanceApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let WithdrawRequest { order, sum } = body.into_inner();
    debug!("💻️ POST withdraw {sum} for order {order} by {}", user.user_id());
    let withdrawal = api.withdraw(user.user_id(), &order, sum).await?;
    Ok(HttpResponse::Ok().json(WithdrawalResponse::from(withdrawal)))
}

route!(my_withdrawals => Get "/user/withdrawals" impl AccountManagement, WithdrawalLedger);
pub async fn my_withdrawals<B: AccountManagement + WithdrawalLedger>(
    user: AuthenticatedUser,
    api: web::Data<BalanceApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_withdrawals for {}", user.user_id());
    let withdrawals = api.withdrawals(user.user_id()).await?;
    let withdrawals = withdrawals.into_iter().map(WithdrawalResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(withdrawals))
}

/// Rejects malformed JSON bodies with the server's own error format.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}
