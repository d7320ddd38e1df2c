//! Per-step validity predicates.
//!
//! Pure functions of the step descriptor, the collected values, and the
//! flow's notion of "today". Invalid input yields `false`; nothing here
//! returns an error.

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::{DateRule, FieldValues, MinimumHorizon, StepDescriptor, StepKind};

const CURRENCY_SYMBOLS: &[char] = &['₦', '$', '€', '£'];
const GROUPING_CHARS: &[char] = &[',', '_', '\''];

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Whether the current values allow leaving `step` forwards.
#[must_use]
pub fn is_step_valid(step: &StepDescriptor, values: &FieldValues, today: NaiveDate) -> bool {
    let key = step.key();
    match step.kind() {
        StepKind::Text => values
            .text(key)
            .is_some_and(|text| !text.trim().is_empty()),
        StepKind::OptionalText | StepKind::Review => true,
        StepKind::Phone => values.text(key).is_some_and(is_valid_phone),
        StepKind::Currency => values.text(key).and_then(parse_currency).is_some(),
        StepKind::Date(rule) => values
            .date(key)
            .is_some_and(|date| is_date_allowed(rule, date, today)),
    }
}

/// Parse a user-typed amount, tolerating currency symbols, grouping
/// separators and whitespace. Only strictly positive amounts are returned.
#[must_use]
pub fn parse_currency(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| {
            !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c) && !GROUPING_CHARS.contains(c)
        })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let amount = Decimal::from_str(&cleaned).ok()?;
    (amount > Decimal::ZERO).then_some(amount)
}

#[must_use]
pub fn is_valid_phone(raw: &str) -> bool {
    let mut digits = 0usize;
    for (idx, c) in raw.trim().chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '+' if idx == 0 => {}
            ' ' | '-' | '(' | ')' => {}
            _ => return false,
        }
    }
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Earliest date a future-dated step accepts.
///
/// This is what a picker is opened with as its minimum; validation applies
/// the same bound, so the two never disagree.
#[must_use]
pub fn earliest_allowed(horizon: MinimumHorizon, today: NaiveDate) -> Option<NaiveDate> {
    match horizon {
        MinimumHorizon::NextDay => today.checked_add_days(Days::new(1)),
        MinimumHorizon::Years(years) => today
            .checked_add_months(Months::new(years.saturating_mul(12)))?
            .checked_add_days(Days::new(1)),
    }
}

/// Picker minimum for a date rule; past-dated rules have none.
#[must_use]
pub fn picker_minimum(rule: DateRule, today: NaiveDate) -> Option<NaiveDate> {
    match rule {
        DateRule::Future(horizon) => earliest_allowed(horizon, today),
        DateRule::Past => None,
    }
}

#[must_use]
pub fn is_date_allowed(rule: DateRule, date: NaiveDate, today: NaiveDate) -> bool {
    match rule {
        DateRule::Future(horizon) => {
            date > today && earliest_allowed(horizon, today).is_some_and(|min| date >= min)
        }
        DateRule::Past => date < today,
    }
}
