//! Relation expression parsing.
//!
//! A relation's defining expression (the text after `define name:`) is turned
//! into a [`Userset`] tree. The default [`OrderedRuleParser`] classifies the
//! text with a fixed sequence of substring rules, first match wins:
//!
//! 1. ` or ` anywhere: split on every occurrence, [`Userset::Union`]
//! 2. ` and `: split on every occurrence, [`Userset::Intersection`]
//! 3. ` but not `: split at the first occurrence, [`Userset::Difference`]
//! 4. a `[...]` list: [`Userset::This`]
//! 5. ` from `: `a from b` is a [`Userset::TupleToUserset`]
//! 6. anything else is a bare relation name, [`Userset::ComputedUserset`]
//!
//! The rules are not a precedence grammar. `a and b or c` parses as
//! `Union[Intersection[a, b], c]` only because ` or ` is checked first, and
//! `a but not b and c` parses as `Intersection[Difference[a, b], c]`.
//! Parenthesized groups are not supported. Callers depend on the
//! [`ExpressionParser`] trait so a grammar-based parser can be swapped in.

use tracing::trace;

use super::syntax::{
    bracket_list, is_identifier, is_reserved, DIFFERENCE_SEPARATOR, INTERSECTION_SEPARATOR,
    TUPLESET_SEPARATOR, UNION_SEPARATOR,
};
use super::Userset;
use crate::error::ExpressionError;

/// Turns one relation expression into a userset tree.
pub trait ExpressionParser: Send + Sync {
    /// Parses a trimmed relation expression.
    fn parse_expression(&self, expression: &str) -> Result<Userset, ExpressionError>;
}

/// The ordered substring-rule parser described in the module docs.
///
/// In strict mode (the default) text that does not reduce to a recognized
/// form is rejected: empty operands, bare names that are not identifiers,
/// `from` operands that are not identifiers, and bracket lists with other
/// text beside them. Lenient mode treats any leftover text as a relation
/// name, exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedRuleParser {
    strict: bool,
}

impl Default for OrderedRuleParser {
    fn default() -> Self {
        Self::strict()
    }
}

impl OrderedRuleParser {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }

    fn parse_node(&self, expression: &str) -> Result<Userset, ExpressionError> {
        let expression = expression.trim();

        if expression.contains(UNION_SEPARATOR) {
            let children = self.parse_all(expression.split(UNION_SEPARATOR))?;
            trace!(expression, children = children.len(), "union");
            return Ok(Userset::Union { children });
        }

        if expression.contains(INTERSECTION_SEPARATOR) {
            let children = self.parse_all(expression.split(INTERSECTION_SEPARATOR))?;
            trace!(expression, children = children.len(), "intersection");
            return Ok(Userset::Intersection { children });
        }

        if let Some((base, subtract)) = expression.split_once(DIFFERENCE_SEPARATOR) {
            trace!(expression, "difference");
            return Ok(Userset::difference(
                self.parse_node(base)?,
                self.parse_node(subtract)?,
            ));
        }

        if let Some(list) = bracket_list(expression) {
            if self.strict && !list.is_standalone() {
                return Err(ExpressionError::new(
                    expression,
                    "unexpected text beside type restriction list",
                ));
            }
            trace!(expression, "direct assignment");
            return Ok(Userset::This);
        }

        if let Some((computed, tupleset)) = expression.split_once(TUPLESET_SEPARATOR) {
            let computed = computed.trim();
            let tupleset = tupleset.trim();
            if self.strict {
                self.check_relation_name(computed, expression)?;
                self.check_relation_name(tupleset, expression)?;
            }
            trace!(expression, tupleset, computed, "tuple to userset");
            return Ok(Userset::tuple_to_userset(tupleset, computed));
        }

        if self.strict {
            self.check_relation_name(expression, expression)?;
        }
        trace!(relation = expression, "computed userset");
        Ok(Userset::computed(expression))
    }

    fn parse_all<'a>(
        &self,
        segments: impl Iterator<Item = &'a str>,
    ) -> Result<Vec<Userset>, ExpressionError> {
        segments.map(|segment| self.parse_node(segment)).collect()
    }

    fn check_relation_name(&self, name: &str, expression: &str) -> Result<(), ExpressionError> {
        if name.is_empty() {
            return Err(ExpressionError::new(expression, "missing relation name"));
        }
        if is_reserved(name) {
            return Err(ExpressionError::new(
                expression,
                format!("reserved keyword '{name}' used as relation name"),
            ));
        }
        if !is_identifier(name) {
            return Err(ExpressionError::new(
                expression,
                format!("invalid relation name '{name}'"),
            ));
        }
        Ok(())
    }
}

impl ExpressionParser for OrderedRuleParser {
    fn parse_expression(&self, expression: &str) -> Result<Userset, ExpressionError> {
        self.parse_node(expression)
    }
}
