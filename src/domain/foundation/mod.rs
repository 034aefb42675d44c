//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the campaign progress domain.

mod campaign_status;
mod errors;
mod ids;
mod timestamp;

pub use campaign_status::CampaignStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, CampaignId, ConnectionId, MAX_ID_LENGTH};
pub use timestamp::Timestamp;
