//! Typed field values collected by a flow.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::FieldKey;
use crate::validation::parse_currency;

/// Raw currency text as typed by the user.
///
/// The raw text is kept verbatim (it is what the API receives); the parsed
/// amount is derived on demand so formatting characters never leak into the
/// decimal value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrencyInput(String);

impl CurrencyInput {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Positive amount with locale formatting stripped, if the input parses.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        parse_currency(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Currency(CurrencyInput),
    Date(NaiveDate),
}

/// The mutable set of values a flow has collected, keyed by step field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl FieldValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning whatever was there before.
    pub fn set(&mut self, key: FieldKey, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(key, value)
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<FieldValue> {
        self.values.remove(&key)
    }

    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    #[must_use]
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        match self.values.get(&key) {
            Some(FieldValue::Text(text)) => Some(text),
            Some(FieldValue::Currency(input)) => Some(input.raw()),
            _ => None,
        }
    }

    #[must_use]
    pub fn currency(&self, key: FieldKey) -> Option<&CurrencyInput> {
        match self.values.get(&key) {
            Some(FieldValue::Currency(input)) => Some(input),
            _ => None,
        }
    }

    #[must_use]
    pub fn date(&self, key: FieldKey) -> Option<NaiveDate> {
        match self.values.get(&key) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }
}
