pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod mock_data;
pub mod models;
pub mod query;
pub mod telemetry;
