//! # Postboard Core
//!
//! The domain layer of the Postboard backend.
//! This crate contains the entities, validation rules and port traits; it has
//! no knowledge of the database, HTTP or GraphQL layers.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::{DomainError, DomainResult, FieldError};
