pub mod cli;
pub mod config;
pub mod date_range;
pub mod error;
pub mod feed;
pub mod http;
pub mod listing;
pub mod logging;
pub mod select;
