use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

use super::control::FormGroup;
use super::value::FieldValue;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ValidationFailure(&'static str);

impl ValidationFailure {
    pub const fn new(kind: &'static str) -> Self {
        Self(kind)
    }

    pub const fn kind(self) -> &'static str {
        self.0
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub trait FieldValidator: Send + Sync {
    fn validate(&self, value: &FieldValue) -> Option<ValidationFailure>;
}

impl<F> FieldValidator for F
where
    F: Fn(&FieldValue) -> Option<ValidationFailure> + Send + Sync,
{
    fn validate(&self, value: &FieldValue) -> Option<ValidationFailure> {
        self(value)
    }
}

pub trait GroupValidator: Send + Sync {
    fn validate(&self, group: &FormGroup) -> Option<ValidationFailure>;
}

impl<F> GroupValidator for F
where
    F: Fn(&FormGroup) -> Option<ValidationFailure> + Send + Sync,
{
    fn validate(&self, group: &FormGroup) -> Option<ValidationFailure> {
        self(group)
    }
}

pub fn required() -> impl FieldValidator {
    |value: &FieldValue| match value {
        FieldValue::Null => Some(ValidationFailure::new("required")),
        FieldValue::Text(text) if text.is_empty() => Some(ValidationFailure::new("required")),
        _ => None,
    }
}

pub fn min_length(min: usize) -> impl FieldValidator {
    move |value: &FieldValue| match value {
        FieldValue::Text(text) if !text.is_empty() && text.chars().count() < min => {
            Some(ValidationFailure::new("minlength"))
        }
        _ => None,
    }
}

pub fn max_length(max: usize) -> impl FieldValidator {
    move |value: &FieldValue| match value {
        FieldValue::Text(text) if text.chars().count() > max => {
            Some(ValidationFailure::new("maxlength"))
        }
        _ => None,
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern must compile")
});

pub fn email() -> impl FieldValidator {
    |value: &FieldValue| match value {
        FieldValue::Text(text) if !text.is_empty() && !EMAIL_PATTERN.is_match(text) => {
            Some(ValidationFailure::new("email"))
        }
        _ => None,
    }
}

pub fn rating_range(min: f64, max: f64) -> impl FieldValidator {
    move |value: &FieldValue| match value {
        FieldValue::Null => None,
        FieldValue::Number(number) if (min..=max).contains(number) => None,
        _ => Some(ValidationFailure::new("range")),
    }
}

pub fn fields_match(first: &'static str, second: &'static str) -> impl GroupValidator {
    move |group: &FormGroup| {
        let (Ok(left), Ok(right)) = (group.field(first), group.field(second)) else {
            return None;
        };
        // A side the user has not edited yet does not count as a mismatch.
        if left.is_pristine().unwrap_or(true) || right.is_pristine().unwrap_or(true) {
            return None;
        }
        let (Ok(left_value), Ok(right_value)) = (left.value(), right.value()) else {
            return None;
        };
        if left_value == right_value {
            return None;
        }
        tracing::debug!(first, second, "does not match");
        Some(ValidationFailure::new("match"))
    }
}
