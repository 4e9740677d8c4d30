//! Repository layer for message persistence.
//!
//! # Responsibility
//! - Define the data access contract for messages.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A missing row is an expected outcome (`None` / `false`), never an error.
//! - Engine faults surface as `StoreError` without retries.

pub mod message_repo;
