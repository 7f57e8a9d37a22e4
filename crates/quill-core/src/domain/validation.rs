//! Field validation with human-readable, client-facing messages.

use std::fmt;

use serde::Serialize;

/// An ordered set of validation failures.
///
/// Each message is rendered as `"<Attribute> <message>"`, e.g. `Title can't be blank`.
/// The strings are part of the public API contract; clients match on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `attribute` (snake_case field name).
    pub fn add(&mut self, attribute: &str, message: &str) {
        self.0.push(format!("{} {}", humanize(attribute), message));
    }

    /// Record a "can't be blank" failure if `value` is missing or whitespace only.
    pub fn require_present(&mut self, attribute: &str, value: Option<&str>) {
        if is_blank(value) {
            self.add(attribute, "can't be blank");
        }
    }

    /// Append all messages of `other`.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Build errors directly from a single attribute failure.
impl From<(&str, &str)> for ValidationErrors {
    fn from((attribute, message): (&str, &str)) -> Self {
        let mut errors = Self::new();
        errors.add(attribute, message);
        errors
    }
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// `user_id` -> `User`, `title` -> `Title`.
fn humanize(attribute: &str) -> String {
    let base = attribute.strip_suffix("_id").unwrap_or(attribute);
    let spaced = base.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
