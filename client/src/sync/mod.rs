//! Position synchronization: local moves out, remote moves in.
//!
//! ```text
//! drag sample -> controller -> store.upsert + connection.send
//! text frame  -> applier    -> store.upsert
//! ```
//!
//! `SyncEngine` is the single owner that wires both paths to one store.

pub mod applier;
pub mod controller;
pub mod engine;
