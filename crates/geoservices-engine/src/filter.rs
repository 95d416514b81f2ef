//! Attribute filtering for `where` clauses.
//!
//! Supports a small SQL subset: `1=1`, and comparisons of a field against a
//! literal joined by `AND`. Operators are `= <> != > >= < <=` plus
//! `IS NULL` / `IS NOT NULL`. Literals are single-quoted strings (with `''`
//! as an escaped quote) or numbers.

use geoservices_core::error::{GeoservicesError, Result};
use geoservices_core::models::JsonObject;
use serde_json::Value;
use std::cmp::Ordering;

/// Parsed `where` clause
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
struct Condition {
    field: String,
    test: Test,
}

#[derive(Debug, Clone, PartialEq)]
enum Test {
    Compare(Operator, Literal),
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Text(String),
    Number(f64),
    Op(Operator),
}

impl WhereClause {
    /// Parse a `where` clause
    pub fn parse(input: &str) -> Result<Self> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() || compact == "1=1" {
            return Ok(Self { conditions: Vec::new() });
        }

        let tokens = tokenize(input)?;
        let mut conditions = Vec::new();
        let mut rest = tokens.as_slice();

        loop {
            let (condition, remaining) = parse_condition(rest)?;
            conditions.push(condition);

            match remaining {
                [] => break,
                [Token::Word(w), tail @ ..] if w.eq_ignore_ascii_case("and") => rest = tail,
                [other, ..] => {
                    return Err(invalid(format!("expected AND, found {:?}", other)));
                }
            }
        }

        Ok(Self { conditions })
    }

    /// Evaluate against a property map
    pub fn matches(&self, properties: Option<&JsonObject>) -> bool {
        self.conditions.iter().all(|c| c.matches(properties))
    }
}

impl Condition {
    fn matches(&self, properties: Option<&JsonObject>) -> bool {
        let value = properties.and_then(|p| p.get(&self.field)).unwrap_or(&Value::Null);

        match &self.test {
            Test::IsNull => value.is_null(),
            Test::IsNotNull => !value.is_null(),
            Test::Compare(op, literal) => match compare(value, literal) {
                Some(ordering) => op.accepts(ordering),
                None => false,
            },
        }
    }
}

impl Operator {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
        }
    }
}

/// Order a property value against a literal; `None` when not comparable
fn compare(value: &Value, literal: &Literal) -> Option<Ordering> {
    match (value, literal) {
        (Value::Number(n), Literal::Number(b)) => n.as_f64()?.partial_cmp(b),
        (Value::String(s), Literal::Text(b)) => Some(s.as_str().cmp(b.as_str())),
        (Value::String(s), Literal::Number(b)) => s.trim().parse::<f64>().ok()?.partial_cmp(b),
        (Value::Bool(flag), Literal::Number(b)) => f64::from(u8::from(*flag)).partial_cmp(b),
        _ => None,
    }
}

fn parse_condition(tokens: &[Token]) -> Result<(Condition, &[Token])> {
    let (field, rest) = match tokens {
        [Token::Word(field), rest @ ..] => (field.clone(), rest),
        [other, ..] => return Err(invalid(format!("expected field name, found {:?}", other))),
        [] => return Err(invalid("expected a condition")),
    };

    match rest {
        [Token::Op(op), Token::Text(s), tail @ ..] => {
            Ok((Condition { field, test: Test::Compare(*op, Literal::Text(s.clone())) }, tail))
        }
        [Token::Op(op), Token::Number(n), tail @ ..] => {
            Ok((Condition { field, test: Test::Compare(*op, Literal::Number(*n)) }, tail))
        }
        [Token::Word(is), Token::Word(null), tail @ ..]
            if is.eq_ignore_ascii_case("is") && null.eq_ignore_ascii_case("null") =>
        {
            Ok((Condition { field, test: Test::IsNull }, tail))
        }
        [Token::Word(is), Token::Word(not), Token::Word(null), tail @ ..]
            if is.eq_ignore_ascii_case("is")
                && not.eq_ignore_ascii_case("not")
                && null.eq_ignore_ascii_case("null") =>
        {
            Ok((Condition { field, test: Test::IsNotNull }, tail))
        }
        _ => Err(invalid(format!("unsupported condition on field {}", field))),
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
        } else if c == '\'' {
            let mut text = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                        text.push('\'');
                        i += 2;
                    }
                    Some('\'') => {
                        i += 1;
                        break;
                    }
                    Some(ch) => {
                        text.push(*ch);
                        i += 1;
                    }
                    None => return Err(invalid("unterminated string literal")),
                }
            }
            tokens.push(Token::Text(text));
        } else if matches!(c, '=' | '<' | '>' | '!') {
            let next = chars.get(i + 1).copied();
            let (op, width) = match (c, next) {
                ('<', Some('>')) | ('!', Some('=')) => (Operator::Ne, 2),
                ('>', Some('=')) => (Operator::Ge, 2),
                ('<', Some('=')) => (Operator::Le, 2),
                ('=', _) => (Operator::Eq, 1),
                ('>', _) => (Operator::Gt, 1),
                ('<', _) => (Operator::Lt, 1),
                _ => return Err(invalid(format!("unexpected character '{}'", c))),
            };
            tokens.push(Token::Op(op));
            i += width;
        } else if c.is_ascii_digit() || c == '-' || c == '.' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let raw: String = chars[start..i].iter().collect();
            let number = raw
                .parse::<f64>()
                .map_err(|_| invalid(format!("invalid number '{}'", raw)))?;
            tokens.push(Token::Number(number));
        } else if c.is_alphanumeric() || c == '_' || c == '"' {
            let quoted = c == '"';
            let start = if quoted { i + 1 } else { i };
            i = start;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if quoted {
                if chars.get(i) != Some(&'"') {
                    return Err(invalid("unterminated quoted identifier"));
                }
                i += 1;
            }
            tokens.push(Token::Word(word));
        } else {
            return Err(invalid(format!("unexpected character '{}'", c)));
        }
    }

    Ok(tokens)
}

fn invalid(reason: impl Into<String>) -> GeoservicesError {
    GeoservicesError::invalid_parameter("where", reason)
}
