//! Session store infrastructure

mod in_memory;
mod token;

pub use in_memory::{InMemorySessionStore, SessionStoreConfig};
pub use token::{token_digest, SessionTokenGenerator};
