//! Recipe Core — shared domain abstractions.
//!
//! This crate defines the entities, repository traits, failure taxonomy and
//! request validation rules that the catalog, store and API crates depend on.
//! It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod model;
pub mod repository;
pub mod validation;
