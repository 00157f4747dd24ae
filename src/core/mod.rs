pub mod config;
pub mod detector;
pub mod emotion;
pub mod error;
pub mod ledger;
pub mod message;
pub mod reply;
pub mod session;
