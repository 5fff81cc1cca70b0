pub mod app;
pub mod config;
pub mod errors;
pub mod exchanges;
pub mod history;
pub mod models;
pub mod report;
