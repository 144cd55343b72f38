use crate::prelude::*;

fn assert_output_channel<T: OutputChannel>() {}

#[test]
fn facade_exports_core_types() {
    assert_output_channel::<ConsoleOutput>();
    assert_output_channel::<MemoryOutput>();

    let _ = ControlName::new("firstName");
    let _ = ValidationFailure::new("required");
    let _ = FieldValue::Null;
    let _ = FormValue::scalar(true);
    let _ = NotificationMode::Email;
    let _ = ConsoleOutput::new();
    let _ = CustomerFormOptions::default();
}

#[test]
fn form_public_api_smoke_compiles() {
    let form = GroupBuilder::new()
        .field(
            "title",
            FieldBuilder::text("")
                .validator(required())
                .validator(min_length(2)),
        )
        .field(
            "score",
            FieldBuilder::new(FieldValue::Null).validator(rating_range(1.0, 5.0)),
        )
        .build()
        .expect("build form");

    let title = form.field("title").expect("title field");
    title.input("ok").expect("write title");
    title.mark_touched().expect("touch title");
    title.revalidate().expect("revalidate title");
    assert!(title.is_dirty().expect("title dirty"));
    assert!(title.is_touched().expect("title touched"));
    assert!(form.is_valid().expect("form validity"));
    let _ = form.value().expect("form value");

    let subscription = title.subscribe(|_value| {}).expect("subscribe");
    drop(subscription);
    form.reset().expect("reset form");
}

#[test]
fn component_public_api_smoke_compiles() {
    let component = CustomerForm::new(CustomerFormOptions::default()).expect("assemble component");
    component.populate_test_data().expect("populate");

    let output = MemoryOutput::new();
    component.save(&output).expect("save");
    assert_eq!(output.lines().len(), 1);

    let _ = component.first_name_message();
    let _ = component.last_name_message();
    let _ = component.email_message();

    let first_name = component.form().field("firstName").expect("first name field");
    let message = display_message(&first_name, &crate::customers::FIRST_NAME_MESSAGES)
        .expect("display message");
    assert_eq!(message, "");
}
