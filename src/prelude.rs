pub use crate::customers::{
    Customer, CustomerForm, CustomerFormOptions, MessageTable, NotificationMode, display_message,
};
pub use crate::form::{
    Control, ControlName, FieldBuilder, FieldControl, FieldValidator, FieldValue, FormError,
    FormGroup, FormResult, FormValue, GroupBuilder, GroupValidator, Subscription,
    ValidationFailure, email, fields_match, max_length, min_length, rating_range, required,
};
pub use crate::output::{ConsoleOutput, MemoryOutput, OutputChannel};
