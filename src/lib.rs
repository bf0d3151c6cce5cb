pub mod bio_fields;
pub mod biography;
pub mod config;
pub mod contracts;
pub mod diagnostics;
pub mod http_client;
pub mod jersey;
pub mod logging;
pub mod merge;
pub mod name_key;
pub mod nba_stats;
pub mod pacing;
pub mod pipeline;
pub mod ratings;
pub mod roster_join;
