//! Lexical building blocks shared by the DSL parsers.

use nom::{
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, satisfy},
    combinator::{all_consuming, not, verify},
    sequence::{delimited, pair, terminated},
    IResult,
};

/// Declaration keywords.
pub(crate) const SCHEMA_KEYWORD: &str = "schema";
pub(crate) const TYPE_KEYWORD: &str = "type";
pub(crate) const DEFINE_KEYWORD: &str = "define";

/// Operator separators, surrounded by single spaces as they appear in text.
pub(crate) const UNION_SEPARATOR: &str = " or ";
pub(crate) const INTERSECTION_SEPARATOR: &str = " and ";
pub(crate) const DIFFERENCE_SEPARATOR: &str = " but not ";
pub(crate) const TUPLESET_SEPARATOR: &str = " from ";

/// Reserved keywords that cannot be used as identifiers
const RESERVED_KEYWORDS: &[&str] = &[
    "type",
    "relations",
    "define",
    "or",
    "and",
    "but",
    "not",
    "from",
    "this",
];

/// Check if a string is a reserved keyword
pub(crate) fn is_reserved(s: &str) -> bool {
    RESERVED_KEYWORDS.contains(&s)
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Parse an identifier (alphanumeric, underscore or hyphen, not a reserved keyword)
pub(crate) fn identifier(input: &str) -> IResult<&str, &str> {
    verify(take_while1(is_identifier_char), |id: &str| !is_reserved(id))(input)
}

/// Returns true if the whole of `text` is a single identifier.
pub(crate) fn is_identifier(text: &str) -> bool {
    all_consuming(identifier)(text).is_ok()
}

/// Matches `keyword` at the start of a line when it is not followed by an
/// identifier character, returning the remainder of the line.
///
/// `typedef` is not a `type` declaration; `type` on its own is one (with a
/// missing name, reported by the caller).
pub(crate) fn declaration<'a>(keyword: &'static str, line: &'a str) -> Option<&'a str> {
    let result: IResult<&'a str, &'a str> =
        terminated(tag(keyword), not(satisfy(is_identifier_char)))(line);
    result.ok().map(|(rest, _)| rest.trim_start())
}

/// The first `[...]` list in an expression, with the text around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BracketList<'a> {
    pub leading: &'a str,
    pub inner: &'a str,
    pub trailing: &'a str,
}

impl BracketList<'_> {
    /// True when nothing but whitespace surrounds the list.
    pub fn is_standalone(&self) -> bool {
        self.leading.trim().is_empty() && self.trailing.trim().is_empty()
    }
}

/// Finds the first `[` and the first `]` following it.
pub(crate) fn bracket_list(input: &str) -> Option<BracketList<'_>> {
    let result: IResult<&str, (&str, &str)> = pair(
        take_until("["),
        delimited(char('['), take_until("]"), char(']')),
    )(input);
    result.ok().map(|(trailing, (leading, inner))| BracketList {
        leading,
        inner,
        trailing,
    })
}

/// Strips a comment from a line.
///
/// A comment starts at a `#` that begins the line or follows whitespace, so
/// `team#member` is left intact. No comment starts inside an unclosed `[`.
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut previous_is_space = true;
    let mut in_list = false;
    for (idx, c) in line.char_indices() {
        match c {
            '#' if previous_is_space && !in_list => return &line[..idx],
            '[' => in_list = true,
            ']' => in_list = false,
            _ => {}
        }
        previous_is_space = c.is_whitespace();
    }
    line
}
