//! Session domain

mod entity;
mod store;

pub use entity::{AuthState, Session, SessionToken};
pub use store::SessionStore;

#[cfg(test)]
pub use store::MockSessionStore;
