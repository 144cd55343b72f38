use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct ControlName(&'static str);

impl ControlName {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for ControlName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl Borrow<str> for ControlName {
    fn borrow(&self) -> &str {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Scalar(FieldValue),
    Group(BTreeMap<ControlName, FormValue>),
}

impl FormValue {
    pub fn scalar(value: impl Into<FieldValue>) -> Self {
        FormValue::Scalar(value.into())
    }

    pub fn group<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, FormValue)>,
    {
        FormValue::Group(
            entries
                .into_iter()
                .map(|(name, value)| (ControlName::new(name), value))
                .collect(),
        )
    }

    pub fn as_scalar(&self) -> Option<&FieldValue> {
        match self {
            FormValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&BTreeMap<ControlName, FormValue>> {
        match self {
            FormValue::Group(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<FieldValue> for FormValue {
    fn from(value: FieldValue) -> Self {
        FormValue::Scalar(value)
    }
}
