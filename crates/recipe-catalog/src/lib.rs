//! Recipe service — catalog bounded context.
//!
//! Responsible for ingredient and recipe lifecycles: uniqueness of names,
//! resolution of a recipe's ingredients and recipe search.

pub mod application;
pub mod domain;
