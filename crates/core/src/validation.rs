//! Field-level validation with aggregated violations.
//!
//! Validators collect *every* violation before reporting, so one rejected request
//! tells the caller about all of its bad fields at once.

use serde::Serialize;

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Violation {
    pub field: String,
    pub rule: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} : {} : {}", self.field, self.rule, self.reason)
    }
}

/// Ordered collection of violations for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(field: impl Into<String>, rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self(vec![Violation::new(field, rule, reason)])
    }

    pub fn push(&mut self, violation: Violation) -> &mut Self {
        self.0.push(violation);
        self
    }

    /// `NotBlank`: the value must contain at least one non-whitespace character.
    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(Violation::new(field, "NotBlank", "must not be blank"));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was collected, otherwise the violations themselves.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// One line per violation, sorted by field name, newline-joined.
    pub fn message(&self) -> String {
        let mut sorted: Vec<&Violation> = self.0.iter().collect();
        sorted.sort();
        sorted
            .into_iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message())
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Implemented by request payloads that carry field constraints.
pub trait Validate {
    fn validate(&self) -> Result<(), Violations>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_title_and_content_produce_sorted_message() {
        let mut v = Violations::new();
        v.not_blank("title", "").not_blank("content", "   ");

        assert_eq!(v.len(), 2);
        assert_eq!(
            v.message(),
            "content : NotBlank : must not be blank\ntitle : NotBlank : must not be blank"
        );
    }

    #[test]
    fn valid_values_produce_no_violations() {
        let mut v = Violations::new();
        v.not_blank("title", "hello").not_blank("content", "  x ");
        assert!(v.into_result().is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: for any set of violated fields, the message has one line per
        /// violation, lines ordered by field, and no trailing newline.
        #[test]
        fn message_lines_are_sorted_without_trailing_newline(
            fields in prop::collection::vec("[a-z]{1,8}", 1..8)
        ) {
            let violations: Violations = fields
                .iter()
                .map(|f| Violation::new(f.as_str(), "NotBlank", "must not be blank"))
                .collect();

            let message = violations.message();
            prop_assert!(!message.ends_with('\n'));

            let lines: Vec<&str> = message.split('\n').collect();
            prop_assert_eq!(lines.len(), fields.len());

            let line_fields: Vec<&str> = lines
                .iter()
                .map(|l| l.split(" : ").next().unwrap())
                .collect();
            let mut expected: Vec<&str> = fields.iter().map(String::as_str).collect();
            expected.sort();
            prop_assert_eq!(line_fields, expected);
        }
    }
}
