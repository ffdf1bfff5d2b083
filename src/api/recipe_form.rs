use std::{borrow::Cow, collections::BTreeMap};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::slug::slugify;

pub const PREPARATION_TIME_UNITS: [&str; 3] = ["Minutes", "Hours", "Days"];
pub const SERVINGS_UNITS: [&str; 3] = ["Portions", "Pieces", "People"];

lazy_static! {
    static ref RE_MEDIA_PATH: Regex =
        Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*(/[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*)*$")
            .unwrap();
}

static REQUIRED: &str = "Required.";
static NOT_A_CHOICE: &str = "Select a valid choice.";

/// Recipe data submitted by an author
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub struct RecipeForm {
    #[validate(custom(function = "validate_title"))]
    #[schema(min_length = 6, max_length = 65, examples("Carrot cake"))]
    pub title: String,

    #[validate(custom(function = "validate_description"))]
    #[schema(max_length = 165)]
    pub description: String,

    #[validate(
        required(message = "Required."),
        custom(function = "validate_positive_number")
    )]
    #[schema(minimum = 1)]
    pub preparation_time: Option<i32>,

    #[validate(custom(function = "validate_preparation_time_unit"))]
    #[schema(examples("Minutes", "Hours", "Days"))]
    pub preparation_time_unit: String,

    #[validate(
        required(message = "Required."),
        custom(function = "validate_positive_number")
    )]
    #[schema(minimum = 1)]
    pub servings: Option<i32>,

    #[validate(custom(function = "validate_servings_unit"))]
    #[schema(examples("Portions", "Pieces", "People"))]
    pub servings_unit: String,

    #[validate(custom(function = "validate_required"))]
    pub preparation_steps: String,

    /// Path of an already stored cover image, relative to the media root
    #[validate(
        length(max = 100, message = "Must have at most 100 characters."),
        regex(path = *RE_MEDIA_PATH, message = "Not a valid media path.")
    )]
    #[schema(examples("recipes/cover/2024/03/01/cake.jpg"))]
    pub cover: Option<String>,

    pub category_id: Option<i32>,

    /// Tag names; unknown tags are created
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

impl RecipeForm {
    /// Normalizes the form (trimmed text, no blank cover, deduplicated tags)
    /// and runs the field rules and the cross-field rules on it. All
    /// failures are collected per field.
    pub fn clean(self) -> Result<RecipeForm, ValidationErrors> {
        let form = self.normalized();
        let mut errors = form.validate().err().unwrap_or_else(ValidationErrors::new);

        if !form.title.is_empty() && form.title == form.description {
            errors.add(
                "title",
                error_with_message("different", "Must be different from description"),
            );
            errors.add(
                "description",
                error_with_message("different", "Must be different from title"),
            );
        }

        if errors.is_empty() {
            Ok(form)
        } else {
            Err(errors)
        }
    }

    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.cover = self
            .cover
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        // tags with the same slug are one tag
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags.iter().map(|t| t.trim()) {
            let slug = slugify(tag);
            if !tag.is_empty() && !tags.iter().any(|t| slugify(t) == slug) {
                tags.push(tag.to_string());
            }
        }
        self.tags = tags;
        self
    }

    /// Form error for a category id that does not exist.
    pub(crate) fn unknown_category() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(
            "category_id",
            error_with_message("unknown", "Unknown category."),
        );
        errors
    }
}

/// Error messages keyed by field name.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

pub(crate) fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("required", REQUIRED));
    }
    Ok(())
}

fn validate_title(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    let length = value.trim().chars().count();
    if length < 6 {
        return Err(error_with_message(
            "min_length",
            "Must have at least 6 characters.",
        ));
    }
    if length > 65 {
        return Err(error_with_message(
            "max_length",
            "Must have at most 65 characters.",
        ));
    }
    if slugify(value).is_empty() {
        return Err(error_with_message(
            "slug",
            "Must contain a letter or digit.",
        ));
    }
    Ok(())
}

fn validate_description(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if value.trim().chars().count() > 165 {
        return Err(error_with_message(
            "max_length",
            "Must have at most 165 characters.",
        ));
    }
    Ok(())
}

fn validate_positive_number(value: i32) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(error_with_message("positive", "Must be a positive number."));
    }
    Ok(())
}

fn validate_choice(value: &str, choices: &[&str]) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !choices.contains(&value) {
        return Err(error_with_message("invalid_choice", NOT_A_CHOICE));
    }
    Ok(())
}

fn validate_preparation_time_unit(value: &str) -> Result<(), ValidationError> {
    validate_choice(value, &PREPARATION_TIME_UNITS)
}

fn validate_servings_unit(value: &str) -> Result<(), ValidationError> {
    validate_choice(value, &SERVINGS_UNITS)
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    let too_long = tags.iter().any(|t| t.trim().chars().count() > 32);
    if too_long {
        return Err(error_with_message(
            "max_length",
            "Tags must have at most 32 characters.",
        ));
    }
    if tags.iter().any(|t| slugify(t).is_empty()) {
        return Err(error_with_message(
            "slug",
            "Tags must contain a letter or digit.",
        ));
    }
    Ok(())
}
