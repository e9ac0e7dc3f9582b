mod client;
mod error;
pub mod models;

pub use client::CourtAuctionClient;
pub use error::FetchError;

use models::RawHistoryItem;

/// Source of an auction case's event/date history. The production
/// implementation talks to the court-auction API; tests substitute a fake.
pub trait HistorySource {
    fn fetch_history(
        &self,
        court_code: &str,
        case_no: &str,
    ) -> Result<Vec<RawHistoryItem>, FetchError>;
}
