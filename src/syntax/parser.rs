//! Verity Parser
//!
//! Converts a single case line into a [`Stmt`] or [`Expr`]. Purely syntactic: names
//! are not resolved and types are not checked here.

use std::rc::Rc;

use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::ast::{BinaryOp, Expr, LogicalOp, Stmt, UnaryOp};
use crate::diagnostics::EvalError;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct CaseParser;

/// Deepest syntax tree the builders accept.
pub const MAX_NESTING: usize = 256;

/// Bound on open brackets plus lambda arrows in one line, checked before pest runs.
const MAX_GROUPING: usize = 64;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a statement: `name = expr` or a bare expression.
pub fn parse_statement(source: &str) -> Result<Stmt, EvalError> {
    check_grouping(source)?;
    let mut pairs = CaseParser::parse(Rule::statement_input, source)
        .map_err(|e| convert_parse_error(e, source))?;
    let input = next_pair(&mut pairs, source, "statement")?;
    let mut inner = input.into_inner();
    let pair = next_pair(&mut inner, source, "statement")?;

    match pair.as_rule() {
        Rule::assignment => build_assignment(pair, source),
        _ => Ok(Stmt::Expr(build_expr(pair, source, 0)?)),
    }
}

/// Parses a bare expression. Assignments are rejected.
pub fn parse_expression(source: &str) -> Result<Expr, EvalError> {
    check_grouping(source)?;
    let mut pairs = CaseParser::parse(Rule::expression_input, source)
        .map_err(|e| convert_parse_error(e, source))?;
    let input = next_pair(&mut pairs, source, "expression")?;
    let mut inner = input.into_inner();
    let pair = next_pair(&mut inner, source, "expression")?;
    build_expr(pair, source, 0)
}

// ============================================================================
// AST BUILDERS
// ============================================================================
//
// `depth` is how far below the root the node being built will sit. Chains fold
// into left-nested trees, so their operands are charged the chain length up front
// and an over-long chain is rejected before any of it is built.

fn build_assignment(pair: Pair<Rule>, source: &str) -> Result<Stmt, EvalError> {
    let mut inner = pair.into_inner();
    let name = next_pair(&mut inner, source, "assignment target")?
        .as_str()
        .to_string();
    // skip the `=` token
    next_pair(&mut inner, source, "'='")?;
    let value = build_expr(next_pair(&mut inner, source, "assigned value")?, source, 0)?;
    Ok(Stmt::Assign { name, value })
}

fn build_expr(pair: Pair<Rule>, source: &str, depth: usize) -> Result<Expr, EvalError> {
    let span = pair.as_span();
    if depth > MAX_NESTING {
        return Err(too_deep(source, (span.start(), span.end())));
    }

    match pair.as_rule() {
        Rule::expr => {
            let mut inner = pair.into_inner();
            build_expr(next_pair(&mut inner, source, "expression")?, source, depth)
        }

        Rule::lambda => build_lambda(pair, source, depth),

        Rule::or_expr => build_logical(pair, source, depth, LogicalOp::Or),
        Rule::and_expr => build_logical(pair, source, depth, LogicalOp::And),

        Rule::not_expr | Rule::unary => {
            let (op, prefix) = if pair.as_rule() == Rule::not_expr {
                (UnaryOp::Not, Rule::not_op)
            } else {
                (UnaryOp::Neg, Rule::neg_op)
            };
            let children: Vec<_> = pair.into_inner().collect();
            let count = children.iter().filter(|c| c.as_rule() == prefix).count();
            let operand = children
                .into_iter()
                .find(|c| c.as_rule() != prefix)
                .ok_or_else(|| missing(source, (span.start(), span.end()), "operand"))?;
            let mut expr = build_expr(operand, source, depth + count)?;
            for _ in 0..count {
                expr = Expr::Unary {
                    op,
                    operand: Box::new(expr),
                };
            }
            Ok(expr)
        }

        Rule::comparison | Rule::sum | Rule::product => build_binary_chain(pair, source, depth),

        Rule::postfix => {
            let mut inner: Vec<_> = pair.into_inner().collect();
            if inner.is_empty() {
                return Err(missing(source, (span.start(), span.end()), "operand"));
            }
            let suffixes = inner.split_off(1);
            let below = depth + suffixes.len();
            let mut expr = build_expr(inner.remove(0), source, below)?;
            for suffix in suffixes {
                expr = match suffix.as_rule() {
                    Rule::call_args => Expr::Call {
                        callee: Box::new(expr),
                        args: build_list_items(suffix, source, below)?,
                    },
                    _ => {
                        let mut index = suffix.into_inner();
                        let index =
                            build_expr(next_pair(&mut index, source, "index")?, source, below)?;
                        Expr::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        }
                    }
                };
            }
            Ok(expr)
        }

        Rule::list => Ok(Expr::List(build_list_items(pair, source, depth + 1)?)),

        Rule::int => pair.as_str().parse::<i64>().map(Expr::Int).map_err(|_| {
            EvalError::syntax(
                format!("integer literal '{}' is out of range", pair.as_str()),
                source,
                (span.start(), span.end()),
            )
        }),

        Rule::float => pair.as_str().parse::<f64>().map(Expr::Float).map_err(|_| {
            EvalError::syntax(
                format!("invalid float literal '{}'", pair.as_str()),
                source,
                (span.start(), span.end()),
            )
        }),

        Rule::boolean => Ok(Expr::Bool(pair.as_str() == "true")),
        Rule::nil => Ok(Expr::Nil),

        Rule::string => {
            let mut inner = pair.into_inner();
            let body = next_pair(&mut inner, source, "string body")?;
            let offset = body.as_span().start();
            Ok(Expr::Str(unescape(body.as_str(), source, offset)?))
        }

        Rule::name => Ok(Expr::Name(pair.as_str().to_string())),

        rule => Err(EvalError::syntax(
            format!("unexpected {}", rule_label(&rule)),
            source,
            (span.start(), span.end()),
        )),
    }
}

fn build_lambda(pair: Pair<Rule>, source: &str, depth: usize) -> Result<Expr, EvalError> {
    let span = pair.as_span();
    let mut params = Vec::new();
    let mut body = None;

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::fn_kw => {}
            Rule::params => {
                for param in child.into_inner() {
                    let name = param.as_str().to_string();
                    if params.contains(&name) {
                        let at = param.as_span();
                        return Err(EvalError::syntax(
                            format!("duplicate parameter '{}'", name),
                            source,
                            (at.start(), at.end()),
                        ));
                    }
                    params.push(name);
                }
            }
            _ => body = Some(build_expr(child, source, depth + 1)?),
        }
    }

    let body = body.ok_or_else(|| missing(source, (span.start(), span.end()), "function body"))?;
    Ok(Expr::Lambda {
        params,
        body: Rc::new(body),
    })
}

/// Splits `operand (op operand)*` into its operands and operator tokens.
fn split_chain<'i>(
    pair: Pair<'i, Rule>,
    source: &str,
) -> Result<(Pair<'i, Rule>, Vec<(Pair<'i, Rule>, Pair<'i, Rule>)>), EvalError> {
    let mut inner = pair.into_inner();
    let first = next_pair(&mut inner, source, "operand")?;
    let mut rest = Vec::new();
    while let Some(op) = inner.next() {
        let at = op.as_span();
        let right = inner
            .next()
            .ok_or_else(|| missing(source, (at.start(), at.end()), "right operand"))?;
        rest.push((op, right));
    }
    Ok((first, rest))
}

fn build_logical(
    pair: Pair<Rule>,
    source: &str,
    depth: usize,
    op: LogicalOp,
) -> Result<Expr, EvalError> {
    let (first, rest) = split_chain(pair, source)?;
    let below = depth + rest.len();
    let mut expr = build_expr(first, source, below)?;
    for (_, right) in rest {
        expr = Expr::Logical {
            op,
            left: Box::new(expr),
            right: Box::new(build_expr(right, source, below)?),
        };
    }
    Ok(expr)
}

fn build_binary_chain(pair: Pair<Rule>, source: &str, depth: usize) -> Result<Expr, EvalError> {
    let (first, rest) = split_chain(pair, source)?;
    let below = depth + rest.len();
    let mut expr = build_expr(first, source, below)?;
    for (op_pair, right) in rest {
        let at = op_pair.as_span();
        let op = BinaryOp::from_symbol(op_pair.as_str()).ok_or_else(|| {
            EvalError::syntax(
                format!("unknown operator '{}'", op_pair.as_str()),
                source,
                (at.start(), at.end()),
            )
        })?;
        expr = Expr::Binary {
            op,
            left: Box::new(expr),
            right: Box::new(build_expr(right, source, below)?),
        };
    }
    Ok(expr)
}

fn build_list_items(pair: Pair<Rule>, source: &str, depth: usize) -> Result<Vec<Expr>, EvalError> {
    pair.into_inner()
        .map(|p| build_expr(p, source, depth))
        .collect()
}

// ============================================================================
// HELPERS
// ============================================================================

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    source: &str,
    what: &str,
) -> Result<Pair<'i, Rule>, EvalError> {
    pairs
        .next()
        .ok_or_else(|| missing(source, (0, source.len()), what))
}

fn missing(source: &str, span: (usize, usize), what: &str) -> EvalError {
    EvalError::syntax(format!("missing {}", what), source, span)
}

fn too_deep(source: &str, span: (usize, usize)) -> EvalError {
    EvalError::syntax(
        format!("expression nests deeper than {} levels", MAX_NESTING),
        source,
        span,
    )
}

/// Rejects lines whose brackets and lambda bodies nest too deeply for the
/// recursive descent in pest. String contents are skipped.
fn check_grouping(source: &str) -> Result<(), EvalError> {
    let mut open = 0usize;
    let mut arrows = 0usize;
    let mut quote = None;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => open += 1,
            (None, ')' | ']') => open = open.saturating_sub(1),
            (None, '=') if matches!(chars.peek(), Some((_, '>'))) => arrows += 1,
            (None, _) => {}
        }
        if open + arrows > MAX_GROUPING {
            return Err(EvalError::syntax(
                format!("brackets and lambdas nest deeper than {} levels", MAX_GROUPING),
                source,
                (i, i + c.len_utf8()),
            ));
        }
    }
    Ok(())
}

fn unescape(raw: &str, source: &str, offset: usize) -> Result<String, EvalError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((j, escaped)) = chars.next() else {
            return Err(EvalError::syntax(
                "dangling escape at end of string",
                source,
                (offset + i, offset + i + 1),
            ));
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            other => {
                return Err(EvalError::syntax(
                    format!("unknown escape sequence '\\{}'", other),
                    source,
                    (offset + i, offset + j + other.len_utf8()),
                ))
            }
        }
    }
    Ok(out)
}

fn convert_parse_error(error: pest::error::Error<Rule>, source: &str) -> EvalError {
    let span = match error.location {
        InputLocation::Pos(pos) => (pos, pos),
        InputLocation::Span((start, end)) => (start, end),
    };
    let error = error.renamed_rules(rule_label);
    EvalError::syntax(error.variant.message().into_owned(), source, span)
}

fn rule_label(rule: &Rule) -> String {
    let label = match rule {
        Rule::EOI => "end of input",
        Rule::expr | Rule::expression_input | Rule::or_expr | Rule::and_expr => "expression",
        Rule::not_expr | Rule::comparison | Rule::sum | Rule::product => "expression",
        Rule::unary | Rule::postfix => "operand",
        Rule::statement_input | Rule::assignment => "statement",
        Rule::assign_op => "'='",
        Rule::lambda | Rule::fn_kw => "function literal",
        Rule::params => "parameter list",
        Rule::call_args => "argument list",
        Rule::index => "index",
        Rule::list => "list",
        Rule::cmp_op => "comparison operator",
        Rule::add_op | Rule::mul_op | Rule::neg_op => "arithmetic operator",
        Rule::not_op => "'not'",
        Rule::and_op => "'and'",
        Rule::or_op => "'or'",
        Rule::keyword => "keyword",
        Rule::name => "name",
        Rule::float => "float",
        Rule::int => "integer",
        Rule::boolean => "boolean",
        Rule::nil => "nil",
        Rule::string | Rule::dq_inner | Rule::sq_inner => "string",
        #[allow(unreachable_patterns)]
        _ => "input",
    };
    label.to_string()
}
