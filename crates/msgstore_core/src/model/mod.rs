//! Domain model for persisted messages.
//!
//! # Invariants
//! - A message carries an id only after the store has assigned one.
//! - Deletion is physical; there is no tombstone state.

pub mod message;
