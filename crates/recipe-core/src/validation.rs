//! Request validation rules and their messages.
//!
//! Each rule function checks one field and returns at most one message. Rules
//! for a single field run in a fixed order and stop at the first violation;
//! rules for different fields are independent, and [`FieldErrors`] collects
//! all of them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Maximum length, in characters, of ingredient and recipe names.
pub const MAX_LENGTH_NAME: usize = 100;

/// Maximum length, in characters, of recipe instructions.
pub const MAX_LENGTH_INSTRUCTIONS: usize = 5000;

/// Largest number of servings a recipe may declare.
pub const MAX_SERVINGS: i32 = 100;

/// Names consist of letters and spaces only.
pub const PATTERN_NAME: &str = r"^[\p{L} ]+$";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATTERN_NAME).expect("PATTERN_NAME is a valid regex"));

/// Fixed messages reported by validation and by the error classifier.
pub mod messages {
    pub const INGREDIENT_NAME_NOT_NULL: &str = "Ingredient name must not be blank";
    pub const INGREDIENT_SIZE_NOT_VALID: &str =
        "Ingredient name must not be longer than 100 characters";
    pub const INGREDIENT_PATTERN_NOT_VALID: &str =
        "Ingredient name may only contain letters and spaces";

    pub const RECIPE_NAME_NOT_NULL: &str = "Recipe name must not be blank";
    pub const RECIPE_NAME_SIZE_NOT_VALID: &str =
        "Recipe name must not be longer than 100 characters";
    pub const RECIPE_NAME_PATTERN_NOT_VALID: &str =
        "Recipe name may only contain letters and spaces";
    pub const RECIPE_TYPE_NOT_NULL: &str = "Recipe type must be VEGETARIAN or OTHER";
    pub const RECIPE_SERVINGS_NOT_NULL: &str = "Number of servings must be given";
    pub const RECIPE_SERVINGS_NOT_VALID: &str = "Number of servings must be between 1 and 100";
    pub const RECIPE_INSTRUCTIONS_NOT_NULL: &str = "Instructions must not be blank";
    pub const RECIPE_INSTRUCTIONS_SIZE_NOT_VALID: &str =
        "Instructions must not be longer than 5000 characters";
    pub const RECIPE_INGREDIENTS_NOT_EMPTY: &str = "A recipe needs at least one ingredient";

    pub const DB_CONSTRAINT_VIOLATED: &str = "The request conflicts with existing data";
}

/// Messages used by [`check_name`] for one kind of name.
#[derive(Debug, Clone, Copy)]
pub struct NameMessages {
    /// Reported when the name is absent or blank.
    pub not_blank: &'static str,
    /// Reported when the name is longer than [`MAX_LENGTH_NAME`].
    pub size: &'static str,
    /// Reported when the name does not match [`PATTERN_NAME`].
    pub pattern: &'static str,
}

/// Messages for ingredient names.
pub const INGREDIENT_NAME: NameMessages = NameMessages {
    not_blank: messages::INGREDIENT_NAME_NOT_NULL,
    size: messages::INGREDIENT_SIZE_NOT_VALID,
    pattern: messages::INGREDIENT_PATTERN_NOT_VALID,
};

/// Messages for recipe names.
pub const RECIPE_NAME: NameMessages = NameMessages {
    not_blank: messages::RECIPE_NAME_NOT_NULL,
    size: messages::RECIPE_NAME_SIZE_NOT_VALID,
    pattern: messages::RECIPE_NAME_PATTERN_NOT_VALID,
};

/// Field name to message mapping for a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: Option<&str>) {
        if let Some(message) = message {
            self.0
                .entry(field.to_owned())
                .or_insert_with(|| message.to_owned());
        }
    }

    /// Returns the message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Number of fields with an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collected errors if any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Implemented by inbound request bodies.
pub trait Validate {
    /// Runs every field rule and collects the failures.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any rule failed.
    fn validate(&self) -> Result<(), FieldErrors>;
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Blank, then size, then pattern. Surrounding whitespace is ignored, as
/// names are stored trimmed.
#[must_use]
pub fn check_name(value: Option<&str>, messages: &NameMessages) -> Option<&'static str> {
    let value = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Some(messages.not_blank),
    };
    if value.chars().count() > MAX_LENGTH_NAME {
        return Some(messages.size);
    }
    if !NAME_RE.is_match(value) {
        return Some(messages.pattern);
    }
    None
}

/// Blank, then size of the trimmed text.
#[must_use]
pub fn check_text(
    value: Option<&str>,
    max_len: usize,
    not_blank: &'static str,
    size: &'static str,
) -> Option<&'static str> {
    match value {
        _ if is_blank(value) => Some(not_blank),
        Some(v) if v.trim().chars().count() > max_len => Some(size),
        _ => None,
    }
}

/// Presence, then inclusive range.
#[must_use]
pub fn check_range(
    value: Option<i32>,
    min: i32,
    max: i32,
    missing: &'static str,
    out_of_range: &'static str,
) -> Option<&'static str> {
    match value {
        None => Some(missing),
        Some(v) if !(min..=max).contains(&v) => Some(out_of_range),
        Some(_) => None,
    }
}

/// Presence only.
#[must_use]
pub fn check_present<T>(value: Option<&T>, missing: &'static str) -> Option<&'static str> {
    if value.is_none() { Some(missing) } else { None }
}

/// Rejects an absent or empty list.
#[must_use]
pub fn check_not_empty<T>(value: Option<&[T]>, empty: &'static str) -> Option<&'static str> {
    if value.is_none_or(<[T]>::is_empty) {
        Some(empty)
    } else {
        None
    }
}
