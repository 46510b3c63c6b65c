//! Domain layer: commands and the rules they are checked against.

pub mod commands;
pub mod ingredients;
pub mod recipes;
