pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod rpc;
pub mod state;
pub mod store;
pub mod types;
