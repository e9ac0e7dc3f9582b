pub mod fetch_detail;
pub mod fetch_list;
pub mod fetch_study;
pub mod update_expired;

use crate::api::FetchError;
use crate::errors::StoreError;
use std::fmt;

/// Umbrella error for pipeline jobs that touch both the upstream API and
/// the store. Never fatal to a run; callers log it and move on.
#[derive(Debug)]
pub enum JobError {
    Fetch(FetchError),
    Store(StoreError),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::Fetch(e) => write!(f, "{e}"),
            JobError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for JobError {}

impl From<FetchError> for JobError {
    fn from(e: FetchError) -> Self {
        JobError::Fetch(e)
    }
}

impl From<StoreError> for JobError {
    fn from(e: StoreError) -> Self {
        JobError::Store(e)
    }
}
