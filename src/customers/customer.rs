use serde::{Deserialize, Serialize};

use crate::form::{FieldValue, FormValue};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    Email,
    Text,
}

impl NotificationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationMode::Email => "email",
            NotificationMode::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(NotificationMode::Email),
            "text" => Some(NotificationMode::Text),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub confirm_email: String,
    pub phone: String,
    pub notification: NotificationMode,
    pub rating: Option<i32>,
    pub send_catalog: bool,
}

impl Customer {
    pub fn to_form_value(&self) -> FormValue {
        FormValue::group([
            ("firstName", FormValue::scalar(self.first_name.clone())),
            ("lastName", FormValue::scalar(self.last_name.clone())),
            (
                "emailGroup",
                FormValue::group([
                    ("email", FormValue::scalar(self.email.clone())),
                    ("confirmEmail", FormValue::scalar(self.confirm_email.clone())),
                ]),
            ),
            ("phone", FormValue::scalar(self.phone.clone())),
            ("notification", FormValue::scalar(self.notification.as_str())),
            ("rating", FormValue::Scalar(rating_value(self.rating))),
            ("sendCatalog", FormValue::scalar(self.send_catalog)),
        ])
    }
}

fn rating_value(rating: Option<i32>) -> FieldValue {
    match rating {
        Some(rating) => FieldValue::Number(f64::from(rating)),
        None => FieldValue::Null,
    }
}
