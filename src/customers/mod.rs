mod component;
mod customer;

#[cfg(test)]
mod tests;

pub use component::{
    CustomerForm, CustomerFormOptions, EMAIL_MESSAGES, FIRST_NAME_MESSAGES, LAST_NAME_MESSAGES,
    MessageCell, MessageTable, display_message,
};
pub use customer::{Customer, NotificationMode};
