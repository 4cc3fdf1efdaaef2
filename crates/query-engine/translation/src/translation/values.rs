//! Handle the translation of literal values.

use query_engine_descriptor::descriptor::Value;

use super::error::Error;
use super::helpers::Env;
use super::tokenizer::Token;

/// Convert a literal token into a value.
///
/// Quoted text becomes a string, numbers become integers or floats depending on whether
/// they have a fractional part, `true`/`false`/`null` become their values and `:name`
/// becomes a placeholder. Anything else is kept as a string.
pub fn cast_literal(token: &Token) -> Value {
    match token {
        Token::Quoted(text) | Token::Identifier(text) => Value::Str(text.clone()),
        Token::Word(word) => cast_word(word),
        other => Value::Str(other.to_string()),
    }
}

fn cast_word(word: &str) -> Value {
    if let Some(name) = word.strip_prefix(':').filter(|name| !name.is_empty()) {
        return Value::Placeholder {
            placeholder: name.to_string(),
        };
    }
    if word.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if word.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if word.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    match numeric_kind(word) {
        Some(NumericKind::Integer) => match word.parse::<i64>() {
            Ok(i) => Value::Int(i),
            // out of range integers still make sense as floats
            Err(_) => word
                .parse::<f64>()
                .map_or_else(|_| Value::Str(word.to_string()), Value::Float),
        },
        Some(NumericKind::Decimal) => word
            .parse::<f64>()
            .map_or_else(|_| Value::Str(word.to_string()), Value::Float),
        None => Value::Str(word.to_string()),
    }
}

enum NumericKind {
    Integer,
    Decimal,
}

/// Matches `[+-]?digits(.digits)?`.
fn numeric_kind(word: &str) -> Option<NumericKind> {
    let unsigned = word.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(word);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match fraction {
        None if all_digits(whole) => Some(NumericKind::Integer),
        Some(fraction) if all_digits(whole) && all_digits(fraction) => Some(NumericKind::Decimal),
        _ => None,
    }
}

/// Cast a literal token and resolve it against the parameters.
pub fn translate_value(env: &Env, token: &Token) -> Result<Value, Error> {
    env.bind(cast_literal(token))
}

/// Resolve a LIMIT or OFFSET operand, which must be a non-negative integer.
pub fn translate_count(env: &Env, token: &Token) -> Result<u64, Error> {
    match translate_value(env, token)? {
        Value::Int(i) => u64::try_from(i).map_err(|_| {
            Error::MalformedClause(format!("LIMIT values must not be negative, found {i}"))
        }),
        other => Err(Error::MalformedClause(format!(
            "LIMIT values must be integers, found {other}"
        ))),
    }
}
