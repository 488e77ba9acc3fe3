use std::cmp::Ordering;

use serde_json::Value;
use thiserror::Error;

/// Comparison operators understood by `visibleIf` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("expression must start with a '{{variable}}' reference")]
    MissingVariable,
    #[error("unterminated variable reference")]
    UnterminatedVariable,
    #[error("empty variable name")]
    EmptyVariable,
    #[error("expected a comparison operator after the variable")]
    MissingOperator,
    #[error("missing literal after operator")]
    MissingLiteral,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unrecognized literal '{0}'")]
    InvalidLiteral(String),
}

/// Single comparison: `{variable} <op> <literal>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub variable: String,
    pub op: CompareOp,
    pub literal: Literal,
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let rest = source.trim();
        let rest = rest.strip_prefix('{').ok_or(ExprError::MissingVariable)?;
        let close = rest.find('}').ok_or(ExprError::UnterminatedVariable)?;
        let variable = &rest[..close];
        if variable.trim().is_empty() {
            return Err(ExprError::EmptyVariable);
        }

        let (op, rest) = parse_operator(rest[close + 1..].trim_start())?;
        let literal = parse_literal(rest.trim())?;

        Ok(Self {
            variable: variable.to_string(),
            op,
            literal,
        })
    }

    /// Evaluates the comparison against `ctx`; `None` when the comparison is
    /// undecidable (ordering against a missing value or a non-number).
    pub fn evaluate(&self, ctx: &Value) -> Option<bool> {
        let left = ctx
            .as_object()
            .and_then(|map| map.get(&self.variable))
            .and_then(Operand::from_value);
        let right = Operand::from_literal(&self.literal);

        match self.op {
            CompareOp::Eq => Some(left.is_some_and(|left| loose_eq(&left, &right))),
            CompareOp::Ne => Some(!left.is_some_and(|left| loose_eq(&left, &right))),
            CompareOp::Gt => compare(left?, &right).map(Ordering::is_gt),
            CompareOp::Lt => compare(left?, &right).map(Ordering::is_lt),
            CompareOp::Ge => compare(left?, &right).map(Ordering::is_ge),
            CompareOp::Le => compare(left?, &right).map(Ordering::is_le),
        }
    }
}

/// Evaluates a visibility expression against a flat data object.
///
/// An empty expression is always true; anything that fails to parse or to
/// compare is false. Never panics.
pub fn evaluate(expression: &str, data: &Value) -> bool {
    if expression.trim().is_empty() {
        return true;
    }
    match Expr::parse(expression) {
        Ok(expr) => expr.evaluate(data).unwrap_or(false),
        Err(error) => {
            tracing::debug!(expression, "visibility expression treated as false: {error}");
            false
        }
    }
}

fn parse_operator(input: &str) -> Result<(CompareOp, &str), ExprError> {
    const OPERATORS: [(&str, CompareOp); 7] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        ("=", CompareOp::Eq),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];
    OPERATORS
        .iter()
        .find_map(|(token, op)| input.strip_prefix(token).map(|rest| (*op, rest)))
        .ok_or(ExprError::MissingOperator)
}

fn parse_literal(input: &str) -> Result<Literal, ExprError> {
    if input.is_empty() {
        return Err(ExprError::MissingLiteral);
    }
    if let Some(quote) = input.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let inner = &input[1..];
        return match inner.strip_suffix(quote) {
            Some(text) if !text.contains(quote) => Ok(Literal::Text(text.to_string())),
            _ => Err(ExprError::UnterminatedString),
        };
    }
    match input {
        "true" => Ok(Literal::Bool(true)),
        "false" => Ok(Literal::Bool(false)),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(Literal::Number)
            .ok_or_else(|| ExprError::InvalidLiteral(other.to_string())),
    }
}

/// Primitive view of a value used by the comparison rules.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Operand {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Operand::Bool(*flag)),
            Value::Number(number) => number.as_f64().map(Operand::Number),
            Value::String(text) => Some(Operand::Text(text.clone())),
            Value::Array(items) => Some(Operand::Text(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            )),
            Value::Object(_) => Some(Operand::Text("[object Object]".into())),
        }
    }

    fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Number(number) => Operand::Number(*number),
            Literal::Text(text) => Operand::Text(text.clone()),
            Literal::Bool(flag) => Operand::Bool(*flag),
        }
    }

    fn to_number(&self) -> Option<f64> {
        match self {
            Operand::Number(number) => Some(*number),
            Operand::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Operand::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok().filter(|number| !number.is_nan())
                }
            }
        }
    }
}

fn loose_eq(left: &Operand, right: &Operand) -> bool {
    match (left, right) {
        (Operand::Text(left), Operand::Text(right)) => left == right,
        (Operand::Bool(left), Operand::Bool(right)) => left == right,
        _ => match (left.to_number(), right.to_number()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        },
    }
}

fn compare(left: Operand, right: &Operand) -> Option<Ordering> {
    if let (Operand::Text(left), Operand::Text(right)) = (&left, right) {
        return Some(left.as_str().cmp(right.as_str()));
    }
    left.to_number()?.partial_cmp(&right.to_number()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variable_with_spaces_verbatim() {
        let expr = Expr::parse("{annual income} >= 1000").expect("parse");
        assert_eq!(expr.variable, "annual income");
        assert_eq!(expr.op, CompareOp::Ge);
        assert_eq!(expr.literal, Literal::Number(1000.0));
    }

    #[test]
    fn single_equals_is_equality() {
        let expr = Expr::parse("{kind} = 'loan'").expect("parse");
        assert_eq!(expr.op, CompareOp::Eq);
        assert_eq!(expr.literal, Literal::Text("loan".into()));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Expr::parse("age > 3"), Err(ExprError::MissingVariable));
        assert_eq!(Expr::parse("{age > 3"), Err(ExprError::UnterminatedVariable));
        assert_eq!(Expr::parse("{} > 3"), Err(ExprError::EmptyVariable));
        assert_eq!(Expr::parse("{age} ~ 3"), Err(ExprError::MissingOperator));
        assert_eq!(Expr::parse("{age} >"), Err(ExprError::MissingLiteral));
        assert_eq!(Expr::parse("{age} = 'x"), Err(ExprError::UnterminatedString));
        assert!(matches!(
            Expr::parse("{age} === 3"),
            Err(ExprError::InvalidLiteral(_))
        ));
        assert!(matches!(
            Expr::parse("{a} = 1 and {b} = 2"),
            Err(ExprError::InvalidLiteral(_))
        ));
    }
}
