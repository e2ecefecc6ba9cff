//! Foundation - value objects shared across the domain.

mod errors;
mod ids;
mod rate;
mod rounding;
mod timestamp;

pub use errors::ValidationError;
pub use ids::RecordId;
pub use rate::Rate;
pub use rounding::round2;
pub use timestamp::Timestamp;
