//! Infrastructure layer - External service implementations

pub mod account;
pub mod catalog;
pub mod inference;
pub mod logging;
pub mod migrations;
pub mod observability;
pub mod session;
pub mod upload;
