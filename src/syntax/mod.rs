//! Parsing of case lines into the expression syntax tree.

pub mod parser;

pub use parser::{parse_expression, parse_statement};
