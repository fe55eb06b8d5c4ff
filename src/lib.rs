pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use server::{app, serve};
pub use state::AppState;
