//! Type restriction parsing.
//!
//! Extracts the subject types listed in the first `[...]` of a relation
//! expression: `[user, user:*, team#member]` yields a plain, a wildcard and a
//! userset reference, in that order. The expression is scanned on its own,
//! independently of the userset parse.

use super::syntax::{bracket_list, is_identifier};
use super::RelationReference;
use crate::error::ExpressionError;

/// Parses the directly related user types of a relation expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRestrictionParser {
    strict: bool,
}

impl Default for TypeRestrictionParser {
    fn default() -> Self {
        Self::strict()
    }
}

impl TypeRestrictionParser {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Returns the references in the first bracketed list, or an empty list
    /// when the expression has none.
    pub fn parse(&self, expression: &str) -> Result<Vec<RelationReference>, ExpressionError> {
        let Some(list) = bracket_list(expression) else {
            return Ok(Vec::new());
        };

        list.inner
            .split(',')
            .map(|entry| self.parse_entry(entry.trim(), expression))
            .collect()
    }

    /// Classifies one entry: `type:*`, then `type#relation`, then `type`.
    fn parse_entry(
        &self,
        entry: &str,
        expression: &str,
    ) -> Result<RelationReference, ExpressionError> {
        if let Some((type_name, wildcard)) = entry.split_once(':') {
            if self.strict {
                self.check_type_name(type_name, entry, expression)?;
                if wildcard != "*" {
                    return Err(ExpressionError::new(
                        expression,
                        format!("expected '{type_name}:*' but found '{entry}'"),
                    ));
                }
            }
            return Ok(RelationReference::wildcard(type_name));
        }

        if let Some((type_name, relation)) = entry.split_once('#') {
            if self.strict {
                self.check_type_name(type_name, entry, expression)?;
                if !is_identifier(relation) {
                    return Err(ExpressionError::new(
                        expression,
                        format!("invalid relation '{relation}' in type restriction '{entry}'"),
                    ));
                }
            }
            return Ok(RelationReference::userset(type_name, relation));
        }

        if self.strict {
            self.check_type_name(entry, entry, expression)?;
        }
        Ok(RelationReference::direct(entry))
    }

    fn check_type_name(
        &self,
        type_name: &str,
        entry: &str,
        expression: &str,
    ) -> Result<(), ExpressionError> {
        if entry.is_empty() {
            return Err(ExpressionError::new(expression, "empty type restriction"));
        }
        if !is_identifier(type_name) {
            return Err(ExpressionError::new(
                expression,
                format!("invalid type '{type_name}' in type restriction '{entry}'"),
            ));
        }
        Ok(())
    }
}
