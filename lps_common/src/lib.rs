//! Types and helpers shared by every crate in the loyalty points workspace.
mod helpers;
mod points;

pub mod op;

pub use helpers::parse_boolean_flag;
pub use points::{Points, PointsConversionError, POINTS_SCALE};
