//! Durable key-value storage for the tracker state.
//!
//! The store is a flat JSON document mapping string keys to JSON values
//! (integers, strings or `null`). It is loaded once at startup and the whole
//! document is written back to disk on every mutation.

mod json_store;

pub use crate::store::json_store::JsonStore;
