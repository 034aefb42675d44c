//! Progress-tracking error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidTransition | 409 |
//! | NotFound | 404 |
//! | Validation | 400 |
//! | TransportWriteFailure | never leaves the connection task |

use thiserror::Error;

use crate::domain::foundation::{
    AccountId, CampaignId, ConnectionId, DomainError, ErrorCode, ValidationError,
};

/// Errors produced by the aggregator, store, and broker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// The change would drive a counter negative; the aggregate is unchanged.
    #[error("Invalid transition for campaign {campaign_id}{}: {reason}", account_suffix(.account_id))]
    InvalidTransition {
        campaign_id: CampaignId,
        account_id: Option<AccountId>,
        reason: String,
    },

    /// No aggregate exists for the campaign.
    #[error("Campaign {0} not found")]
    NotFound(CampaignId),

    /// Request payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A client connection could not be written to.
    #[error("Write to connection {connection_id} failed: {reason}")]
    TransportWriteFailure {
        connection_id: ConnectionId,
        reason: String,
    },
}

fn account_suffix(account_id: &Option<AccountId>) -> String {
    account_id
        .as_ref()
        .map(|a| format!(" (account {})", a))
        .unwrap_or_default()
}

impl ProgressError {
    pub fn invalid_transition(
        campaign_id: &CampaignId,
        account_id: Option<&AccountId>,
        reason: impl Into<String>,
    ) -> Self {
        ProgressError::InvalidTransition {
            campaign_id: campaign_id.clone(),
            account_id: account_id.cloned(),
            reason: reason.into(),
        }
    }

    pub fn not_found(campaign_id: &CampaignId) -> Self {
        ProgressError::NotFound(campaign_id.clone())
    }

    pub fn transport_write_failure(connection_id: ConnectionId, reason: impl Into<String>) -> Self {
        ProgressError::TransportWriteFailure {
            connection_id,
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProgressError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            ProgressError::NotFound(_) => ErrorCode::CampaignNotFound,
            ProgressError::Validation(_) => ErrorCode::ValidationFailed,
            ProgressError::TransportWriteFailure { .. } => ErrorCode::TransportWriteFailure,
        }
    }
}

impl From<ProgressError> for DomainError {
    fn from(err: ProgressError) -> Self {
        let base = DomainError::new(err.code(), err.to_string());
        match err {
            ProgressError::InvalidTransition {
                campaign_id,
                account_id,
                ..
            } => {
                let base = base.with_detail("campaign_id", campaign_id.as_str());
                match account_id {
                    Some(account) => base.with_detail("account_id", account.as_str()),
                    None => base,
                }
            }
            ProgressError::NotFound(campaign_id) => {
                base.with_detail("campaign_id", campaign_id.as_str())
            }
            ProgressError::Validation(v) => base.with_detail("field", v.field()),
            ProgressError::TransportWriteFailure { connection_id, .. } => {
                base.with_detail("connection_id", connection_id.to_string())
            }
        }
    }
}
