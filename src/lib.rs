pub mod api;
pub mod codes;
pub mod config;
pub mod db;
pub mod errors;
pub mod geo;
pub mod jobs;
pub mod model;
pub mod reconcile;

#[cfg(test)]
mod tests;
