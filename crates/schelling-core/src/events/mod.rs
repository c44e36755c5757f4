//! Event System
//!
//! JSONL logging of move events.

pub mod logger;

pub use logger::EventLogger;
