mod driver_tests;
mod store_tests;
mod utils;
