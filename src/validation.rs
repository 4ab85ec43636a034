//! Declarative field validation shared by every request body.
//!
//! Each payload type lists its fields once through [`Validate::fields`]; the
//! same list is used on create and update paths. Only the first failing rule
//! of a field ends up in [`ValidationErrors`].

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty text or `true`.
    Required,
    /// Text with at least this many characters.
    Min(usize),
    Email,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Bool(bool),
}

/// A field as seen by the rule checker: JSON name, current value, rules in order.
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub rules: &'static [Rule],
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: FieldValue<'a>, rules: &'static [Rule]) -> Self {
        Self { name, value, rules }
    }
}

/// Field name → message. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub trait Validate {
    fn fields(&self) -> Vec<Field<'_>>;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = check(&self.fields());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub fn check(fields: &[Field<'_>]) -> ValidationErrors {
    let mut errors = BTreeMap::new();
    for field in fields {
        if let Some(rule) = field.rules.iter().find(|r| !passes(**r, field.value)) {
            errors.insert(field.name.to_string(), message(field.name, *rule));
        }
    }
    ValidationErrors(errors)
}

fn passes(rule: Rule, value: FieldValue<'_>) -> bool {
    match (rule, value) {
        (Rule::Required, FieldValue::Text(s)) => !s.is_empty(),
        (Rule::Required, FieldValue::Bool(b)) => b,
        (Rule::Min(n), FieldValue::Text(s)) => s.chars().count() >= n,
        (Rule::Email, FieldValue::Text(s)) => is_valid_email(s),
        // length and shape rules only apply to text
        (Rule::Min(_) | Rule::Email, _) => true,
    }
}

fn message(field: &str, rule: Rule) -> String {
    match rule {
        Rule::Required => format!("{field} is required"),
        Rule::Min(n) => format!("{field} must be at least {n} characters long"),
        Rule::Email => format!("{field} is not a valid email"),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
