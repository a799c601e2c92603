//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod catalog;
pub mod health;
pub mod middleware;
pub mod predict;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::RequireSession;
pub use router::{create_router, RouterOptions};
pub use state::AppState;
