//! Core types for STYLiSH.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod product;
pub mod provider;
pub mod user;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use product::{Color, Product, Variant};
pub use provider::{Provider, ProviderError, Role, RoleError};
pub use user::{Session, SignupForm, UserProfile};
