use std::fmt::Display;

use thiserror::Error;

use crate::numeric::{format_number, parse_exact, parse_number_or_nan, strip_separators};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("form has no field named '{0}'")]
    UnknownField(String),

    #[error("form does not support {0}")]
    Unsupported(&'static str),
}

/// How a field rewrites its text on every keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReformatPolicy {
    /// Regroup whatever leading number is present; no number clears the field.
    Lenient,
    /// Regroup only when the whole text is numeric, otherwise keep the old text.
    Strict,
}

/**
 * A numeric text box. Holds the grouped text the user sees, the forms
 * parse it again on submit.
 */
#[derive(Debug, Clone)]
pub struct InputField {
    name: &'static str,
    policy: ReformatPolicy,
    text: String,
}

impl InputField {
    pub fn new(name: &'static str, policy: ReformatPolicy) -> Self {
        InputField {
            name,
            policy,
            text: String::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn type_text(&mut self, raw: &str) {
        match self.policy {
            ReformatPolicy::Lenient => {
                self.text = format_number(parse_number_or_nan(raw));
            }
            ReformatPolicy::Strict => {
                if let Some(value) = parse_exact(&strip_separators(raw)) {
                    self.text = format_number(value);
                }
            }
        }
    }
}

/// Event surface shared by the three calculators.
pub trait Form: Display {
    fn field_mut(&mut self, name: &str) -> Option<&mut InputField>;

    fn submit(&mut self);

    fn delete(&mut self, _index: usize) -> Result<(), FormError> {
        Err(FormError::Unsupported("deleting records"))
    }

    fn input(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))?;
        field.type_text(raw);
        tracing::trace!(field = field.name(), text = field.text(), "field updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod lenient {
        use super::*;

        fn typed(raw: &str) -> String {
            let mut field = InputField::new("amount", ReformatPolicy::Lenient);
            field.type_text(raw);
            field.text().to_owned()
        }

        #[test]
        fn regroups_digits() {
            assert_eq!(typed("1000000"), "1,000,000")
        }
        #[test]
        fn regroups_misplaced_separators() {
            assert_eq!(typed("10,00"), "1,000")
        }
        #[test]
        fn keeps_leading_number() {
            assert_eq!(typed("12abc"), "12")
        }
        #[test]
        fn letters_clear_the_field() {
            assert_eq!(typed("abc"), "")
        }
        #[test]
        fn empty_stays_empty() {
            assert_eq!(typed(""), "")
        }
    }

    mod strict {
        use super::*;

        #[test]
        fn regroups_numeric_text() {
            let mut field = InputField::new("rate", ReformatPolicy::Strict);
            field.type_text("71000");
            assert_eq!(field.text(), "71,000");
        }
        #[test]
        fn keeps_previous_text_on_garbage() {
            let mut field = InputField::new("rate", ReformatPolicy::Strict);
            field.type_text("71,000");
            field.type_text("71,000x");
            assert_eq!(field.text(), "71,000");
        }
        #[test]
        fn empty_becomes_zero() {
            let mut field = InputField::new("rate", ReformatPolicy::Strict);
            field.type_text("5");
            field.type_text("");
            assert_eq!(field.text(), "0");
        }
        #[test]
        fn trailing_dot_is_swallowed() {
            let mut field = InputField::new("rate", ReformatPolicy::Strict);
            field.type_text("2,640.");
            assert_eq!(field.text(), "2,640");
        }
    }

    #[test]
    fn clear_empties_text() {
        let mut field = InputField::new("usd", ReformatPolicy::Lenient);
        field.type_text("100");
        field.clear();
        assert_eq!(field.text(), "");
    }
}
