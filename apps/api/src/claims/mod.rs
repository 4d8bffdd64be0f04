//! Claim lifecycle: storage, the review step machine, the work-search log and
//! the read-side projection served to the dashboard and admin queue.

use thiserror::Error;

use crate::claims::ids::ClaimId;

pub mod admin;
pub mod handlers;
pub mod ids;
pub mod intake;
pub mod memory;
pub mod postgres;
pub mod projection;
pub mod store;
pub mod transitions;
pub mod work_log;

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim {0} not found")]
    NotFound(ClaimId),

    #[error("Claim {0} already exists")]
    DuplicateId(ClaimId),

    #[error("Invalid claim id: {0}")]
    InvalidClaimId(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for ClaimError {
    fn from(e: sqlx::Error) -> Self {
        ClaimError::Storage(e.to_string())
    }
}
