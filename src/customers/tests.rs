use super::*;
use crate::form::{FieldBuilder, FieldValue, GroupBuilder, ValidationFailure};
use crate::output::MemoryOutput;
use futures::executor::block_on;
use serde_json::json;
use std::thread;
use std::time::Duration;

fn test_options() -> CustomerFormOptions {
    CustomerFormOptions {
        email_debounce: Duration::from_millis(30),
    }
}

#[test]
fn fresh_component_matches_the_assembly_table() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    let form = component.form();

    assert!(!form.is_valid().expect("fresh validity"));
    assert!(form.is_pristine().expect("fresh pristine"));
    assert_eq!(
        serde_json::to_value(form.value().expect("form value")).expect("serialize"),
        json!({
            "emailGroup": { "confirmEmail": "", "email": "" },
            "firstName": "",
            "lastName": "",
            "notification": "email",
            "phone": "",
            "rating": null,
            "sendCatalog": true,
        })
    );
    assert_eq!(component.first_name_message(), "");
    assert_eq!(component.last_name_message(), "");
    assert_eq!(component.email_message(), "");
}

#[test]
fn short_first_name_shows_the_min_length_text() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    let first_name = component.form().field("firstName").expect("first name field");

    first_name.input("Ja").expect("short input");
    assert_eq!(
        component.first_name_message(),
        "The first name must be longer than 3 characters."
    );

    first_name.input("").expect("cleared input");
    assert_eq!(component.first_name_message(), "Please enter your first name.");

    first_name.input("Jack").expect("valid input");
    assert_eq!(component.first_name_message(), "");
}

#[test]
fn overlong_last_name_shows_the_max_length_text() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    let last_name = component.form().field("lastName").expect("last name field");

    last_name.input("x".repeat(51)).expect("overlong input");
    assert_eq!(
        component.last_name_message(),
        "The last name must be less than 50 characters."
    );
}

#[test]
fn untouched_fields_keep_messages_empty() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    let first_name = component.form().field("firstName").expect("first name field");

    assert!(!first_name.is_valid().expect("validity"));
    assert_eq!(
        display_message(&first_name, &FIRST_NAME_MESSAGES).expect("message"),
        ""
    );

    first_name.mark_touched().expect("touch");
    assert_eq!(
        display_message(&first_name, &FIRST_NAME_MESSAGES).expect("message"),
        "Please enter your first name."
    );
}

#[test]
fn email_pair_mismatch_invalidates_the_group() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    let form = component.form();
    let email_field = form.field("emailGroup.email").expect("email field");
    let confirm = form.field("emailGroup.confirmEmail").expect("confirm field");
    let group = form.group("emailGroup").expect("email group");

    email_field.input("a@b.com").expect("email input");
    confirm.input("a@b.com").expect("confirm input");
    assert!(group.is_valid().expect("group validity"));

    confirm.input("other@b.com").expect("mismatched confirm");
    assert_eq!(
        group.failures().expect("failures"),
        vec![ValidationFailure::new("match")]
    );
    assert!(!group.is_valid().expect("group validity"));
}

#[test]
fn text_notification_requires_a_phone_number() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    let form = component.form();
    let notification = form.field("notification").expect("notification field");
    let phone = form.field("phone").expect("phone field");
    assert!(phone.is_valid().expect("fresh phone validity"));

    notification.input("text").expect("switch to text");
    assert_eq!(
        phone.failures().expect("failures"),
        vec![ValidationFailure::new("required")]
    );

    notification.input("email").expect("switch back");
    assert!(phone.is_valid().expect("phone validity"));
}

#[test]
fn populate_test_data_fills_the_sample_record() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    component.populate_test_data().expect("populate");
    let form = component.form();

    assert_eq!(
        serde_json::to_value(form.value().expect("form value")).expect("serialize"),
        json!({
            "emailGroup": {
                "confirmEmail": "jack@torchwood.com",
                "email": "jack@torchwood.com",
            },
            "firstName": "Jack",
            "lastName": "Harkness",
            "notification": "email",
            "phone": "",
            "rating": null,
            "sendCatalog": false,
        })
    );
    assert!(form.is_pristine().expect("pristine after populate"));
    assert!(form.is_valid().expect("validity after populate"));
    assert_eq!(component.first_name_message(), "");
    assert_eq!(component.email_message(), "");
}

#[test]
fn save_emits_the_serialized_form_line() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    component.populate_test_data().expect("populate");

    let output = MemoryOutput::new();
    component.save(&output).expect("save");

    let expected_value = json!({
        "emailGroup": {
            "confirmEmail": "jack@torchwood.com",
            "email": "jack@torchwood.com",
        },
        "firstName": "Jack",
        "lastName": "Harkness",
        "notification": "email",
        "phone": "",
        "rating": null,
        "sendCatalog": false,
    });
    let expected = format!(
        "Saved: {}",
        serde_json::to_string(&expected_value).expect("serialize expected")
    );
    assert_eq!(output.lines(), vec![expected]);
}

#[test]
fn email_message_waits_for_the_quiet_window() {
    let component = CustomerForm::new(test_options()).expect("assemble component");
    let email_field = component.form().field("emailGroup.email").expect("email field");

    block_on(email_field.input_async("not-an-email")).expect("invalid input");
    assert_eq!(component.email_message(), "Please enter a valid email address.");
}

#[test]
fn rapid_email_edits_deliver_only_the_latest_message() {
    let component = CustomerForm::new(test_options()).expect("assemble component");
    let email_field = component.form().field("emailGroup.email").expect("email field");

    let first = {
        let email_field = email_field.clone();
        thread::spawn(move || {
            block_on(email_field.input_async("bad")).expect("first input");
        })
    };
    thread::sleep(Duration::from_millis(10));
    let second = {
        let email_field = email_field.clone();
        thread::spawn(move || {
            block_on(email_field.input_async("")).expect("second input");
        })
    };

    first.join().expect("first thread joins");
    second.join().expect("second thread joins");

    assert_eq!(component.email_message(), "Please enter your email address.");
}

#[test]
fn reset_clears_a_stale_email_message() {
    let component = CustomerForm::new(test_options()).expect("assemble component");
    let email_field = component.form().field("emailGroup.email").expect("email field");

    block_on(email_field.input_async("not-an-email")).expect("invalid input");
    assert_eq!(component.email_message(), "Please enter a valid email address.");

    component.form().reset().expect("reset");
    assert_eq!(component.email_message(), "");
}

#[test]
fn failure_texts_join_in_report_order() {
    const BOTH_MESSAGES: MessageTable = MessageTable::new(&[
        (ValidationFailure::new("alpha"), "First part."),
        (ValidationFailure::new("beta"), "Second part."),
    ]);
    const PARTIAL_MESSAGES: MessageTable =
        MessageTable::new(&[(ValidationFailure::new("beta"), "Second part.")]);

    let always_alpha = |_value: &FieldValue| Some(ValidationFailure::new("alpha"));
    let always_beta = |_value: &FieldValue| Some(ValidationFailure::new("beta"));
    let form = GroupBuilder::new()
        .field(
            "code",
            FieldBuilder::text("")
                .validator(always_alpha)
                .validator(always_beta),
        )
        .build()
        .expect("form must build");
    let code = form.field("code").expect("code field");
    code.input("x").expect("input");

    assert_eq!(
        display_message(&code, &BOTH_MESSAGES).expect("message"),
        "First part. Second part."
    );
    assert_eq!(
        display_message(&code, &PARTIAL_MESSAGES).expect("message"),
        "Second part."
    );
}

#[test]
fn customer_round_trips_through_serde() {
    let customer = Customer {
        first_name: "Jack".to_owned(),
        last_name: "Harkness".to_owned(),
        email: "jack@torchwood.com".to_owned(),
        confirm_email: "jack@torchwood.com".to_owned(),
        phone: String::new(),
        notification: NotificationMode::Email,
        rating: Some(4),
        send_catalog: false,
    };

    let serialized = serde_json::to_value(&customer).expect("serialize");
    assert_eq!(
        serialized,
        json!({
            "confirmEmail": "jack@torchwood.com",
            "email": "jack@torchwood.com",
            "firstName": "Jack",
            "lastName": "Harkness",
            "notification": "email",
            "phone": "",
            "rating": 4,
            "sendCatalog": false,
        })
    );

    let decoded: Customer = serde_json::from_value(serialized).expect("deserialize");
    assert_eq!(decoded, customer);
}

#[test]
fn notification_mode_parses_wire_names() {
    assert_eq!(NotificationMode::parse("email"), Some(NotificationMode::Email));
    assert_eq!(NotificationMode::parse("text"), Some(NotificationMode::Text));
    assert_eq!(NotificationMode::parse("fax"), None);
    assert_eq!(NotificationMode::Email.as_str(), "email");
    assert_eq!(NotificationMode::Text.as_str(), "text");
}
