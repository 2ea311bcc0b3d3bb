//! DSL parser for OpenFGA authorization models.
//!
//! Compiles the OpenFGA modeling DSL into an [`AuthorizationModel`]. The text
//! is scanned line by line; `schema`, `type` and `define` declarations are
//! recognized and every other line (`model`, `relations`, blank lines,
//! comments) is skipped. Each relation expression is handed both to an
//! [`ExpressionParser`] for its rewrite and to a [`TypeRestrictionParser`]
//! for its directly related user types.
//!
//! Example DSL:
//! ```text
//! model
//!   schema 1.1
//!
//! type user
//!
//! type document
//!   relations
//!     define owner: [user]
//!     define editor: [user] or owner
//!     define viewer: [user, user:*] or editor or viewer from parent
//!     define parent: [folder]
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, instrument, trace};

use super::expression::{ExpressionParser, OrderedRuleParser};
use super::restriction::TypeRestrictionParser;
use super::syntax::{
    declaration, is_identifier, is_identifier_char, is_reserved, strip_comment, DEFINE_KEYWORD,
    SCHEMA_KEYWORD, TYPE_KEYWORD,
};
use super::{AuthorizationModel, Metadata, RelationMetadata, TypeDefinition, Userset};
use crate::error::{DomainError, DomainResult};

/// Options controlling how strictly expressions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject expressions and subject lists that do not reduce to a
    /// recognized form instead of reading leftover text as a relation name.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ParseOptions {
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Line-oriented parser for the modeling DSL.
///
/// Generic over the expression parser so the ordered-rule classifier can be
/// replaced without touching callers. A parser holds no per-compilation
/// state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct DslParser<E = OrderedRuleParser> {
    expressions: E,
    restrictions: TypeRestrictionParser,
    options: ParseOptions,
}

impl DslParser<OrderedRuleParser> {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        let expressions = if options.strict {
            OrderedRuleParser::strict()
        } else {
            OrderedRuleParser::lenient()
        };
        Self::with_expression_parser(expressions, options)
    }
}

impl Default for DslParser<OrderedRuleParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExpressionParser> DslParser<E> {
    /// Creates a parser that delegates relation expressions to `expressions`.
    pub fn with_expression_parser(expressions: E, options: ParseOptions) -> Self {
        let restrictions = if options.strict {
            TypeRestrictionParser::strict()
        } else {
            TypeRestrictionParser::lenient()
        };
        Self {
            expressions,
            restrictions,
            options,
        }
    }

    /// Compiles a complete DSL text into an authorization model.
    ///
    /// Stops at the first malformed line; no partial model is returned.
    #[instrument(skip_all, fields(bytes = input.len()))]
    pub fn parse(&self, input: &str) -> DomainResult<AuthorizationModel> {
        let scan = input
            .lines()
            .enumerate()
            .try_fold(Scan::default(), |scan, (idx, line)| {
                self.scan_line(scan, idx + 1, line)
            })?;

        let model = scan.finish();
        info!(
            schema_version = model.schema_version.as_deref(),
            types = model.type_definitions.len(),
            "compiled authorization model"
        );
        Ok(model)
    }

    fn scan_line(&self, mut scan: Scan, line_no: usize, raw: &str) -> DomainResult<Scan> {
        let line = strip_comment(raw.trim()).trim_end();
        if line.is_empty() {
            return Ok(scan);
        }

        if let Some(rest) = declaration(SCHEMA_KEYWORD, line) {
            let version = first_token(rest).ok_or_else(|| {
                DomainError::structural(line_no, "schema declaration missing version")
            })?;
            if self.options.strict && !version.starts_with(is_identifier_char) {
                return Err(DomainError::structural(
                    line_no,
                    format!("invalid schema version '{version}'"),
                ));
            }
            if let Some(existing) = &scan.schema_version {
                return Err(DomainError::structural(
                    line_no,
                    format!("schema version already declared as '{existing}'"),
                ));
            }
            debug!(version, line = line_no, "schema declared");
            scan.schema_version = Some(version.to_string());
        } else if let Some(rest) = declaration(TYPE_KEYWORD, line) {
            let type_name = first_token(rest)
                .ok_or_else(|| DomainError::structural(line_no, "type declaration missing name"))?;
            self.check_declared_name("type", type_name, line_no)?;
            scan.open_type(type_name, line_no)?;
        } else if let Some(rest) = declaration(DEFINE_KEYWORD, line) {
            self.define_relation(&mut scan, line_no, rest)?;
        } else {
            trace!(line = line_no, text = line, "skipped line");
        }

        Ok(scan)
    }

    /// Handles the text after `define`: `name: expression`.
    fn define_relation(&self, scan: &mut Scan, line_no: usize, rest: &str) -> DomainResult<()> {
        let ScanState::TypeOpen(pending) = &mut scan.state else {
            return Err(DomainError::structural(line_no, "define outside type block"));
        };

        let (head, expression) = rest.split_once(':').ok_or_else(|| {
            DomainError::structural(line_no, "relation definition missing ':'")
        })?;
        let relation = first_token(head)
            .ok_or_else(|| DomainError::structural(line_no, "relation definition missing name"))?;
        self.check_declared_name("relation", relation, line_no)?;
        let expression = expression.trim();

        if pending.relations.contains_key(relation) {
            return Err(DomainError::structural(
                line_no,
                format!(
                    "relation '{relation}' already defined on type '{}'",
                    pending.type_name
                ),
            ));
        }

        let rewrite = self
            .expressions
            .parse_expression(expression)
            .map_err(|source| DomainError::ExpressionSyntaxError {
                line: line_no,
                source,
            })?;
        let directly_related_user_types = self
            .restrictions
            .parse(expression)
            .map_err(|source| DomainError::ExpressionSyntaxError {
                line: line_no,
                source,
            })?;

        debug!(
            type_name = %pending.type_name,
            relation,
            rewrite = rewrite.kind(),
            restrictions = directly_related_user_types.len(),
            "relation defined"
        );

        pending.relations.insert(relation.to_string(), rewrite);
        pending.metadata.insert(
            relation.to_string(),
            RelationMetadata {
                directly_related_user_types,
            },
        );
        Ok(())
    }

    /// In strict mode a declared name must be usable as a reference.
    fn check_declared_name(&self, kind: &str, name: &str, line_no: usize) -> DomainResult<()> {
        if !self.options.strict {
            return Ok(());
        }
        if is_reserved(name) {
            return Err(DomainError::structural(
                line_no,
                format!("reserved keyword '{name}' used as {kind} name"),
            ));
        }
        if !is_identifier(name) {
            return Err(DomainError::structural(
                line_no,
                format!("invalid {kind} name '{name}'"),
            ));
        }
        Ok(())
    }
}

fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Accumulated state of one compilation, threaded through the line scan.
#[derive(Debug, Default)]
struct Scan {
    schema_version: Option<String>,
    completed: Vec<TypeDefinition>,
    seen_types: HashSet<String>,
    state: ScanState,
}

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    NoTypeOpen,
    TypeOpen(PendingType),
}

/// A type whose `define` lines are still being read.
#[derive(Debug)]
struct PendingType {
    type_name: String,
    relations: IndexMap<String, Userset>,
    metadata: IndexMap<String, RelationMetadata>,
}

impl PendingType {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            relations: IndexMap::new(),
            metadata: IndexMap::new(),
        }
    }

    /// Closes the type. A type without relations carries no metadata.
    fn finish(self) -> TypeDefinition {
        let metadata = if self.relations.is_empty() {
            None
        } else {
            Some(Metadata {
                relations: self.metadata,
            })
        };
        TypeDefinition {
            type_name: self.type_name,
            relations: self.relations,
            metadata,
        }
    }
}

impl Scan {
    fn open_type(&mut self, type_name: &str, line_no: usize) -> DomainResult<()> {
        if !self.seen_types.insert(type_name.to_string()) {
            return Err(DomainError::structural(
                line_no,
                format!("type '{type_name}' already declared"),
            ));
        }
        self.flush();
        debug!(type_name, line = line_no, "type declared");
        self.state = ScanState::TypeOpen(PendingType::new(type_name));
        Ok(())
    }

    fn flush(&mut self) {
        if let ScanState::TypeOpen(pending) = std::mem::take(&mut self.state) {
            self.completed.push(pending.finish());
        }
    }

    fn finish(mut self) -> AuthorizationModel {
        self.flush();
        assemble(self.schema_version, self.completed)
    }
}

/// Packages the schema version and closed type definitions into a model.
fn assemble(
    schema_version: Option<String>,
    type_definitions: Vec<TypeDefinition>,
) -> AuthorizationModel {
    AuthorizationModel {
        schema_version,
        type_definitions,
    }
}

// ============ Public API ============

/// Parse a DSL string into an AuthorizationModel with strict expression checks.
///
/// # Example
///
/// ```
/// let dsl = r#"
/// model
///   schema 1.1
///
/// type user
///
/// type document
///   relations
///     define owner: [user]
///     define viewer: [user] or owner
/// "#;
///
/// let model = fgac_domain::model::parse(dsl).unwrap();
/// assert_eq!(model.type_definitions.len(), 2);
/// ```
pub fn parse(input: &str) -> DomainResult<AuthorizationModel> {
    DslParser::new().parse(input)
}

/// Parse a DSL string with explicit options.
pub fn parse_with_options(input: &str, options: ParseOptions) -> DomainResult<AuthorizationModel> {
    DslParser::with_options(options).parse(input)
}
