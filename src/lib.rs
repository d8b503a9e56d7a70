pub mod config;
pub mod error;
pub mod http_client;
pub mod link;
pub mod player_fetch;
pub mod provider;
pub mod search_fetch;
pub mod state;
pub mod value;
