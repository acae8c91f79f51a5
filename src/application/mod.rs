//! Application layer - The bot's behavior
//!
//! This layer contains:
//! - Bot: the event loop runtime (poll, dispatch, flush, sleep)
//! - Router: message classification and response selection
//! - Scheduler: deferred outbound deliveries
//! - Commands: the command table and its leaf commands
//! - Errors: layered error types

pub mod bot;
pub mod commands;
pub mod errors;
pub mod router;
pub mod scheduler;
