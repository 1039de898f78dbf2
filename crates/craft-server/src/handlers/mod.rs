//! HTTP handler modules for the crafting API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`CraftService`](crate::service::CraftService),
//! and return JSON responses. No business logic lives in handlers.

pub mod combinations;
pub mod craftnodes;
pub mod generation;
pub mod health;
