//! HTTP/JSON API for the crafting backend.
//!
//! Serves combination lookups and writes backed by the craft-storage
//! SQLite store, plus a passthrough to the text-to-voxel asset provider.
//! This crate contains the server framework, configuration, API schema
//! types, error handling, and route definitions.

pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
