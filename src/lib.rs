// App-specific modules
pub mod config;
pub mod error;
pub mod order;
pub mod payment;
pub mod rates;
pub mod tip;
pub mod units;
pub mod utils;
