// File: ./src/model/mod.rs
pub mod card;
pub mod contacts;
pub mod form;

pub use card::{CardConfiguration, Contact, NameOrder, Person};
pub use contacts::{ContactEntry, ContactField, ContactList};
pub use form::{CardField, CardForm, EventKind, FieldError, FieldErrorKind, FormStep};
