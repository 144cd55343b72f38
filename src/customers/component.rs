use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::form::{
    FieldBuilder, FieldControl, FieldValue, FormError, FormGroup, FormResult, GroupBuilder,
    Subscription, ValidationFailure, email, fields_match, max_length, min_length, rating_range,
    required,
};
use crate::output::OutputChannel;

use super::customer::{Customer, NotificationMode};

#[derive(Clone, Copy, Debug)]
pub struct MessageTable(&'static [(ValidationFailure, &'static str)]);

impl MessageTable {
    pub const fn new(entries: &'static [(ValidationFailure, &'static str)]) -> Self {
        Self(entries)
    }

    pub fn text_for(&self, failure: ValidationFailure) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(kind, _)| *kind == failure)
            .map(|(_, text)| *text)
    }
}

pub const FIRST_NAME_MESSAGES: MessageTable = MessageTable::new(&[
    (
        ValidationFailure::new("required"),
        "Please enter your first name.",
    ),
    (
        ValidationFailure::new("minlength"),
        "The first name must be longer than 3 characters.",
    ),
]);

pub const LAST_NAME_MESSAGES: MessageTable = MessageTable::new(&[
    (
        ValidationFailure::new("required"),
        "Please enter your last name.",
    ),
    (
        ValidationFailure::new("maxlength"),
        "The last name must be less than 50 characters.",
    ),
]);

pub const EMAIL_MESSAGES: MessageTable = MessageTable::new(&[
    (
        ValidationFailure::new("required"),
        "Please enter your email address.",
    ),
    (
        ValidationFailure::new("email"),
        "Please enter a valid email address.",
    ),
]);

pub fn display_message(field: &FieldControl, table: &MessageTable) -> FormResult<String> {
    if !(field.is_touched()? || field.is_dirty()?) {
        return Ok(String::new());
    }
    let texts: Vec<&str> = field
        .failures()?
        .iter()
        .filter_map(|failure| table.text_for(*failure))
        .collect();
    Ok(texts.join(" "))
}

#[derive(Clone, Default)]
pub struct MessageCell {
    text: Arc<RwLock<String>>,
}

impl MessageCell {
    pub fn get(&self) -> String {
        let text = match self.text.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        text.clone()
    }

    fn set(&self, message: String) {
        let mut text = match self.text.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *text = message;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CustomerFormOptions {
    pub email_debounce: Duration,
}

impl Default for CustomerFormOptions {
    fn default() -> Self {
        Self {
            email_debounce: Duration::from_millis(1000),
        }
    }
}

pub struct CustomerForm {
    form: FormGroup,
    first_name_message: MessageCell,
    last_name_message: MessageCell,
    email_message: MessageCell,
    _subscriptions: Vec<Subscription>,
}

impl CustomerForm {
    pub fn new(options: CustomerFormOptions) -> FormResult<Self> {
        let form = Self::assemble()?;
        let mut subscriptions = Vec::new();

        let phone = form.field("phone")?;
        let notification = form.field("notification")?;
        subscriptions.push(notification.subscribe(move |value| {
            Self::set_notification(&phone, value);
        })?);

        let first_name_message = MessageCell::default();
        let first_name = form.field("firstName")?;
        subscriptions.push(Self::wire_message(
            &first_name,
            &first_name_message,
            &FIRST_NAME_MESSAGES,
            Duration::ZERO,
        )?);

        let last_name_message = MessageCell::default();
        let last_name = form.field("lastName")?;
        subscriptions.push(Self::wire_message(
            &last_name,
            &last_name_message,
            &LAST_NAME_MESSAGES,
            Duration::ZERO,
        )?);

        let email_message = MessageCell::default();
        let email_field = form.field("emailGroup.email")?;
        subscriptions.push(Self::wire_message(
            &email_field,
            &email_message,
            &EMAIL_MESSAGES,
            options.email_debounce,
        )?);

        Ok(Self {
            form,
            first_name_message,
            last_name_message,
            email_message,
            _subscriptions: subscriptions,
        })
    }

    fn assemble() -> FormResult<FormGroup> {
        GroupBuilder::new()
            .field(
                "firstName",
                FieldBuilder::text("")
                    .validator(required())
                    .validator(min_length(3)),
            )
            .field(
                "lastName",
                FieldBuilder::text("")
                    .validator(required())
                    .validator(max_length(50)),
            )
            .group(
                "emailGroup",
                GroupBuilder::new()
                    .field(
                        "email",
                        FieldBuilder::text("")
                            .validator(required())
                            .validator(email()),
                    )
                    .field("confirmEmail", FieldBuilder::text("").validator(required()))
                    .validator(fields_match("email", "confirmEmail")),
            )
            .field("phone", FieldBuilder::text(""))
            .field(
                "notification",
                FieldBuilder::text(NotificationMode::Email.as_str()),
            )
            .field(
                "rating",
                FieldBuilder::new(FieldValue::Null).validator(rating_range(1.0, 5.0)),
            )
            .field("sendCatalog", FieldBuilder::boolean(true))
            .build()
    }

    fn wire_message(
        field: &FieldControl,
        cell: &MessageCell,
        table: &'static MessageTable,
        debounce: Duration,
    ) -> FormResult<Subscription> {
        let observed = field.clone();
        let cell = cell.clone();
        field.subscribe_with_debounce(debounce, move |_value| {
            if let Ok(message) = display_message(&observed, table) {
                cell.set(message);
            }
        })
    }

    fn set_notification(phone: &FieldControl, value: &FieldValue) {
        let wants_text = value.as_text().and_then(NotificationMode::parse)
            == Some(NotificationMode::Text);
        tracing::debug!(phone_required = wants_text, "notification preference changed");
        let reconfigured = if wants_text {
            phone.set_validators(vec![Arc::new(required())])
        } else {
            phone.clear_validators()
        };
        if reconfigured.is_ok() {
            drop(phone.revalidate());
        }
    }

    pub fn form(&self) -> &FormGroup {
        &self.form
    }

    pub fn first_name_message(&self) -> String {
        self.first_name_message.get()
    }

    pub fn last_name_message(&self) -> String {
        self.last_name_message.get()
    }

    pub fn email_message(&self) -> String {
        self.email_message.get()
    }

    pub fn save<O>(&self, output: &O) -> FormResult<()>
    where
        O: OutputChannel,
    {
        let value = self.form.value()?;
        let serialized = serde_json::to_string(&value)
            .map_err(|error| FormError::SerializeFailed(error.to_string()))?;
        let valid = self.form.is_valid()?;
        tracing::debug!(valid, "saving customer form");
        output
            .emit(&format!("Saved: {serialized}"))
            .map_err(|error| FormError::OutputFailed(error.to_string()))
    }

    pub fn populate_test_data(&self) -> FormResult<()> {
        let record = Customer {
            first_name: "Jack".to_owned(),
            last_name: "Harkness".to_owned(),
            email: "jack@torchwood.com".to_owned(),
            confirm_email: "jack@torchwood.com".to_owned(),
            phone: String::new(),
            notification: NotificationMode::Email,
            rating: None,
            send_catalog: false,
        };
        self.form.set_value(record.to_form_value())
    }
}
