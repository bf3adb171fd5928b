//! Storage abstractions for the service layer
//!
//! Contains the reusable file-backed sequence store so that domain stores
//! persisting small collections as JSON do not duplicate the load/save cycle.

pub mod json_array_store;
