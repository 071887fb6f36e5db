//! Literal values appearing in rule actions and metadata.

use std::fmt;

/// A parsed DSL value.
///
/// Anything that is not a quoted string, boolean or number passes
/// through as [`Value::Raw`]; that is how algebraic expressions such as
/// `p50_7d*0.98` or function-like references survive parsing intact.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Raw(String),
}

impl Value {
    /// Parse a single value token.
    ///
    /// Integer literals wider than `i64` degrade to [`Value::Float`].
    pub fn parse(s: &str) -> Self {
        if is_quoted(s) {
            return Self::Str(s[1..s.len() - 1].to_string());
        }
        if s.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if is_int_literal(s) {
            if let Ok(n) = s.parse::<i64>() {
                return Self::Int(n);
            }
            if let Ok(f) = s.parse::<f64>() {
                return Self::Float(f);
            }
        }
        if is_float_literal(s) {
            if let Ok(f) = s.parse::<f64>() {
                return Self::Float(f);
            }
        }
        Self::Raw(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

fn is_quoted(s: &str) -> bool {
    (s.len() >= 2 && s.starts_with('"') && s.ends_with('"'))
        || (s.len() >= 2 && s.starts_with('\'') && s.ends_with('\''))
}

/// `-?\d+`
fn is_int_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?\d*\.\d+`
fn is_float_literal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let Some((int_part, frac_part)) = body.split_once('.') else {
        return false;
    };
    int_part.bytes().all(|b| b.is_ascii_digit())
        && !frac_part.is_empty()
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_strings() {
        assert_eq!(Value::parse("\"flip\""), Value::Str("flip".into()));
        assert_eq!(Value::parse("'ok'"), Value::Str("ok".into()));
    }

    #[test]
    fn booleans_are_case_insensitive() {
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("FALSE"), Value::Bool(false));
        assert_eq!(Value::parse("True"), Value::Bool(true));
    }

    #[test]
    fn integers_and_floats() {
        assert_eq!(Value::parse("90"), Value::Int(90));
        assert_eq!(Value::parse("-12"), Value::Int(-12));
        assert_eq!(Value::parse("0.98"), Value::Float(0.98));
        assert_eq!(Value::parse("-.5"), Value::Float(-0.5));
    }

    #[test]
    fn integers_wider_than_i64_degrade_to_float() {
        assert_eq!(
            Value::parse("99999999999999999999"),
            Value::Float(1e20)
        );
        assert_eq!(
            Value::parse("-99999999999999999999"),
            Value::Float(-1e20)
        );
    }

    #[test]
    fn expressions_pass_through_raw() {
        assert_eq!(
            Value::parse("p50_7d*0.98"),
            Value::Raw("p50_7d*0.98".into())
        );
        assert_eq!(Value::parse("MIN(a,b)"), Value::Raw("MIN(a,b)".into()));
        // Leading '+' is not part of the numeric grammar.
        assert_eq!(Value::parse("+5"), Value::Raw("+5".into()));
    }
}
