pub mod aggregate;
pub mod box_score;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod fields;
pub mod http_client;
pub mod ingest;
pub mod logging;
pub mod memo;
pub mod odds_api;
pub mod pairing;
pub mod retry;
pub mod stats;
pub mod stats_api;
pub mod store;
pub mod teams;
pub mod win_model;
