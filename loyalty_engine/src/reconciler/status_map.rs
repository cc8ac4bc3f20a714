use crate::db_types::OrderStatusType;

/// Translates an accrual oracle status into an order status.
///
/// | Oracle       | Order        |
/// |--------------|--------------|
/// | `REGISTERED` | `NEW`        |
/// | `PROCESSING` | `PROCESSING` |
/// | `INVALID`    | `INVALID`    |
/// | `PROCESSED`  | `PROCESSED`  |
///
/// Anything else is unrecognised, and yields `None`: the order is left alone and polled again on the next round.
pub fn map_oracle_status(status: &str) -> Option<OrderStatusType> {
    match status {
        "REGISTERED" => Some(OrderStatusType::New),
        "PROCESSING" => Some(OrderStatusType::Processing),
        "INVALID" => Some(OrderStatusType::Invalid),
        "PROCESSED" => Some(OrderStatusType::Processed),
        _ => None,
    }
}
