pub mod controller;
pub mod schema;
pub mod user;

use std::fmt::Debug;

pub use controller::{FormController, FormState, SubmitAttempt, SubmitResult};
pub use schema::{FieldErrors, Rule, Schema};

/// A named input of a form.
pub trait Field: Copy + Ord + Debug + 'static {
    /// Every field of the form, in display order.
    const ALL: &'static [Self];

    /// The field's name in posted form data and templates.
    fn name(self) -> &'static str;

    /// Secret fields are never written back into a rendered page.
    fn is_secret(self) -> bool {
        false
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

/// The values of a form, one string per field.
pub trait Form: Default + Clone {
    type Field: Field;

    fn value(&self, field: Self::Field) -> &str;

    fn set_value(&mut self, field: Self::Field, value: String);

    fn schema() -> Schema<Self::Field>;
}
