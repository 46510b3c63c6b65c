//! Shared test doubles and utilities for the recipe service.

mod clock;
mod repository;

pub use clock::{FixedClock, fixed_time};
pub use repository::{
    FailingRepository, INGREDIENT_NAME_CONSTRAINT, INGREDIENT_REFERENCE_CONSTRAINT,
    InMemoryCatalog, RECIPE_NAME_CONSTRAINT,
};
