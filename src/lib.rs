pub mod analytics;
pub mod cli;
pub mod companion;
pub mod core;
pub mod storage;
