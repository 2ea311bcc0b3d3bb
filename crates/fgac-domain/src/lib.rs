//! fgac-domain: OpenFGA modeling DSL compiler
//!
//! This crate compiles the OpenFGA modeling DSL into an authorization model
//! document ready for any serde serializer:
//! - Line-oriented structural parsing of `schema`, `type` and `define`
//! - Relation expressions into userset rewrite trees
//! - Bracketed subject lists into directly related user types
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                fgac-domain                   │
//! ├─────────────────────────────────────────────┤
//! │  model/parser      - Structural parser      │
//! │  model/expression  - Userset rewrites       │
//! │  model/restriction - Type restrictions      │
//! │  model/types       - Model document         │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod model;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult, ExpressionError};
pub use model::{parse, parse_with_options, AuthorizationModel, DslParser, ParseOptions};
