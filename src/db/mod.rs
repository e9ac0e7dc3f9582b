pub mod auctions;
pub mod connection;

pub use auctions::{AuctionStore, SqliteAuctionStore};
pub use connection::{init_db, Database};
