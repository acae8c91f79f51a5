//! Bartender - a small-talk-and-commands chat bot
//!
//! A polling event loop drives everything: inbound events are drained
//! without blocking, messages are routed into small talk or commands, and
//! replies are usually deferred a randomized interval to feel human.

pub mod application;
pub mod domain;
pub mod infrastructure;
