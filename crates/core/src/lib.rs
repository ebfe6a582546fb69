//! Bolt Core - Shared types library.
//!
//! This crate provides common types used across all Bolt components:
//! - `storefront` - Public-facing checkout and cart pages
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Backend payloads are decoded into these types by the
//! storefront's commerce client.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for backend IDs, money and order states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
