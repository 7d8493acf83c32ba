//! Core types and trait definitions for the facility catalog.
//!
//! This crate is free of HTTP and cloud SDK dependencies. It holds the
//! resource records and their table codecs, the partial-update expression
//! builder, the binary ingestion pipeline, and the capability traits that
//! storage backends implement.

// Native `async fn` in traits; the capability traits spell out `Send` futures
// and implementations use plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod attr;
pub mod error;
pub mod ingest;
pub mod memory;
pub mod resource;
pub mod resources;
pub mod store;
pub mod update;

pub use error::{Error, Result};
