//! Subsystem modules for the office assistant.

pub mod agents;
pub mod comms;
pub mod memory;
pub mod tools;
