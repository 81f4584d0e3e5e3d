//! Core types and trait definitions for the agency service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store, catalog and API crates depend on it; every domain rule lives here so
//! it can be tested without either.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cat;
pub mod catalog;
pub mod error;
pub mod mission;
pub mod store;

pub use error::{Error, Result};

pub type CatId = i64;
pub type MissionId = i64;
pub type TargetId = i64;
