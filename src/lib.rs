pub mod customers;
pub mod form;
pub mod output;
pub mod prelude;

#[cfg(test)]
mod test_public_api;

pub use customers::{Customer, CustomerForm};
