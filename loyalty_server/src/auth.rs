//! User identification.
//!
//! Registration, credentials and sessions are handled by the authentication gateway that sits in front of this server.
//! The gateway forwards the id of the authenticated user in a request header (`X-User-Id` unless configured
//! otherwise), and handlers receive it through the [`AuthenticatedUser`] extractor. Requests without the header are
//! rejected with `401 Unauthorized` before the handler runs.
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::*;
use loyalty_engine::db_types::UserId;

use crate::errors::ServerError;

pub const DEFAULT_USER_ID_HEADER: &str = "X-User-Id";

/// The name of the header carrying the user id. Register it as app data to override the default.
#[derive(Debug, Clone)]
pub struct UserIdHeader(String);

impl UserIdHeader {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserIdHeader {
    fn default() -> Self {
        Self::new(DEFAULT_USER_ID_HEADER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(user_from_request(req))
    }
}

fn user_from_request(req: &HttpRequest) -> Result<AuthenticatedUser, ServerError> {
    let header = req.app_data::<UserIdHeader>().map(UserIdHeader::as_str).unwrap_or(DEFAULT_USER_ID_HEADER);
    let value = req.headers().get(header).ok_or_else(|| {
        debug!("💻️ Request to {} has no {header} header", req.path());
        ServerError::Unauthenticated
    })?;
    let user = value.to_str().map(str::trim).map_err(|e| {
        warn!("💻️ The {header} header is not valid text. {e}");
        ServerError::Unauthenticated
    })?;
    if user.is_empty() {
        debug!("💻️ Request to {} has an empty {header} header", req.path());
        return Err(ServerError::Unauthenticated);
    }
    Ok(AuthenticatedUser(UserId::from(user)))
}
