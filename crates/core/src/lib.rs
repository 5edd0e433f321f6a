//! Storeloom Core - Shared domain vocabulary.
//!
//! This crate provides the types every Storeloom component agrees on:
//! - `studio` - Tenant state layer (collection, mutations, catalog sync, orders)
//! - `cli` - Command-line driver for a persisted studio
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no runtime,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, money helpers, emails, secret keys, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
