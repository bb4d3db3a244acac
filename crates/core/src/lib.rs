//! STYLiSH Core - Shared domain types.
//!
//! This crate provides the types exchanged between the API gateway and its
//! collaborators (catalog and user services):
//! - closed enumerations for the values the gateway validates (`Category`,
//!   `Provider`, `Role`)
//! - catalog records (`Product`, `Color`, `Variant`)
//! - identity records (`UserProfile`, `Session`, `SignupForm`)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Database encoding is available behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
