//! Core types and trait definitions for the lawsuit dashboard.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Backends implement [`store::LawsuitStore`]; the API layer depends on that
//! abstraction only.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod filter;
pub mod lawsuit;
pub mod memory;
pub mod month;
pub mod page;
pub mod series;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
