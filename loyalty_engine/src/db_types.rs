use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use lps_common::Points;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::helpers::is_valid_luhn;

//--------------------------------------       UserId        ---------------------------------------------------------
/// The identifier of a user, as assigned by the (external) registration and authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------     OrderNumber     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid order number")]
pub struct InvalidOrderNumber(pub String);

/// A purchase order number. It can only be constructed from a string of ASCII digits that passes the Luhn checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize)]
#[sqlx(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Validates and wraps `number`. Surrounding whitespace is ignored.
    pub fn new(number: &str) -> Result<Self, InvalidOrderNumber> {
        let number = number.trim();
        if is_valid_luhn(number) {
            Ok(Self(number.to_string()))
        } else {
            Err(InvalidOrderNumber(number.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderNumber {
    type Err = InvalidOrderNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = InvalidOrderNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl<'de> Deserialize<'de> for OrderNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        OrderNumber::new(&s).map_err(serde::de::Error::custom)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The status of an uploaded order.
///
/// ```text
///   NEW ──► PROCESSING ──► INVALID
///    │                 └─► PROCESSED
///    └──────────────────► INVALID | PROCESSED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order has been uploaded, but the accrual oracle has not reported on it yet.
    New,
    /// The accrual oracle has acknowledged the order, but has not made a final decision.
    Processing,
    /// The accrual oracle rejected the order. No points are awarded. Terminal.
    Invalid,
    /// The accrual oracle accepted the order and its accrual has been credited. Terminal.
    Processed,
}

impl OrderStatusType {
    /// Orders in a terminal status are never modified again, and are no longer polled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid | Self::Processed)
    }

    /// The statuses that the reconciler still needs to poll for.
    pub fn pending() -> [OrderStatusType; 2] {
        [Self::New, Self::Processing]
    }

    /// Whether the state machine allows moving from `self` to `next`. Staying in the same status is not a
    /// transition.
    pub fn can_transition_to(&self, next: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!((self, next), (New, Processing) | (New, Invalid) | (New, Processed))
            || matches!((self, next), (Processing, Invalid) | (Processing, Processed))
    }

    /// The statuses from which `self` can be reached.
    pub fn predecessors(&self) -> &'static [OrderStatusType] {
        use OrderStatusType::*;
        match self {
            New => &[],
            Processing => &[New],
            Invalid | Processed => &[New, Processing],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Processing => "PROCESSING",
            Self::Invalid => "INVALID",
            Self::Processed => "PROCESSED",
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PROCESSING" => Ok(Self::Processing),
            "INVALID" => Ok(Self::Invalid),
            "PROCESSED" => Ok(Self::Processed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub number: OrderNumber,
    pub owner_id: UserId,
    pub status: OrderStatusType,
    pub accrual: Points,
    pub uploaded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub number: OrderNumber,
    pub owner_id: UserId,
    /// The time the order was uploaded by the user
    pub uploaded_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(number: OrderNumber, owner_id: UserId) -> Self {
        Self { number, owner_id, uploaded_at: Utc::now() }
    }
}

//--------------------------------------       Account       ---------------------------------------------------------
/// A user's loyalty points account.
///
/// `current_balance + withdrawn` always equals the total accrual of the user's `PROCESSED` orders.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub user_id: UserId,
    pub current_balance: Points,
    pub withdrawn: Points,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The total accrual ever credited to this account.
    pub fn total_credited(&self) -> Points {
        self.current_balance + self.withdrawn
    }
}

//--------------------------------------     Withdrawal      ---------------------------------------------------------
/// A debit against an account's balance. Withdrawals are append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Withdrawal {
    pub id: i64,
    pub user_id: UserId,
    /// The order the points are spent on. This is not one of the user's uploaded orders.
    pub order_number: OrderNumber,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub user_id: UserId,
    pub order_number: OrderNumber,
    pub sum: Points,
}

impl NewWithdrawal {
    pub fn new(user_id: UserId, order_number: OrderNumber, sum: Points) -> Self {
        Self { user_id, order_number, sum }
    }
}
