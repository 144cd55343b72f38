mod builder;
mod control;
mod subscription;
mod validators;
mod value;


pub use builder::{FieldBuilder, GroupBuilder};
pub use control::{Control, FieldControl, FormError, FormGroup, FormResult};
pub use subscription::{Subscription, SubscriptionId};
pub use validators::{
    FieldValidator, GroupValidator, ValidationFailure, email, fields_match, max_length,
    min_length, rating_range, required,
};
pub use value::{ControlName, FieldValue, FormValue};
