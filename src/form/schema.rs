use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::form::{Field, Form};
use crate::translation::MessageKey;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// A single check applied to a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule<F> {
    Required,
    /// Minimum number of characters.
    MinLength(usize),
    /// Maximum number of characters.
    MaxLength(usize),
    Email,
    Uppercase,
    Lowercase,
    Digit,
    /// Must equal the value of another field.
    Matches(F),
}

impl<F: Field> Rule<F> {
    fn passes<V: Form<Field = F>>(self, value: &str, values: &V) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MinLength(min) => value.chars().count() >= min,
            Rule::MaxLength(max) => value.chars().count() <= max,
            Rule::Email => EMAIL.is_match(value),
            Rule::Uppercase => value.chars().any(|c| c.is_ascii_uppercase()),
            Rule::Lowercase => value.chars().any(|c| c.is_ascii_lowercase()),
            Rule::Digit => value.chars().any(|c| c.is_ascii_digit()),
            Rule::Matches(other) => value == values.value(other),
        }
    }
}

#[derive(Debug, Clone)]
struct FieldRules<F> {
    field: F,
    rules: Vec<(Rule<F>, MessageKey)>,
}

/// Ordered validation rules per field; the first failing rule of a field wins.
#[derive(Debug, Clone)]
pub struct Schema<F> {
    fields: Vec<FieldRules<F>>,
}

impl<F: Field> Default for Schema<F> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<F: Field> Schema<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: F, rules: impl IntoIterator<Item = (Rule<F>, MessageKey)>) -> Self {
        self.fields.push(FieldRules {
            field,
            rules: rules.into_iter().collect(),
        });
        self
    }

    pub fn validate<V: Form<Field = F>>(&self, values: &V) -> FieldErrors<F> {
        let errors = self
            .fields
            .iter()
            .filter_map(|entry| {
                let value = values.value(entry.field);
                entry
                    .rules
                    .iter()
                    .find(|(rule, _)| !rule.passes(value, values))
                    .map(|(_, key)| (entry.field, *key))
            })
            .collect();

        FieldErrors(errors)
    }

    /// Fields whose rules read the value of `field`.
    pub fn dependents(&self, field: F) -> impl Iterator<Item = F> + '_ {
        self.fields
            .iter()
            .filter(move |entry| {
                entry
                    .rules
                    .iter()
                    .any(|(rule, _)| *rule == Rule::Matches(field))
            })
            .map(|entry| entry.field)
    }
}

/// Message key per failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F>(BTreeMap<F, MessageKey>);

impl<F: Field> Default for FieldErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Field> FieldErrors<F> {
    pub fn get(&self, field: F) -> Option<MessageKey> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, MessageKey)> + '_ {
        self.0.iter().map(|(field, key)| (*field, *key))
    }
}
