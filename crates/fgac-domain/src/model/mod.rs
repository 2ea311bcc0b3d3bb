//! Authorization model types and DSL compiler.
//!
//! This module contains:
//! - Core type definitions (AuthorizationModel, TypeDefinition, Userset)
//! - The line-oriented DSL parser and its expression and type restriction parsers

mod expression;
mod parser;
mod restriction;
mod syntax;
mod types;
#[cfg(test)]
mod types_proptest;

pub use expression::{ExpressionParser, OrderedRuleParser};
pub use parser::{parse, parse_with_options, DslParser, ParseOptions};
pub use restriction::TypeRestrictionParser;
pub use types::*;
