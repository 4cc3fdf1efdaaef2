//! Helpers for walking the token stream and resolving values.

use query_compiler_configuration::CompilerSettings;
use query_engine_descriptor::descriptor::{Params, Value};

use super::error::Error;
use super::tokenizer::Token;

/// Words that can never be used as a bare table, column or alias name.
const RESERVED_WORDS: &[&str] = &[
    "AND", "AS", "BY", "CROSS", "DELETE", "DISTINCT", "FROM", "FULL", "GROUP", "IGNORE", "INNER",
    "INSERT", "INTO", "JOIN", "LEFT", "LIKE", "LIMIT", "NATURAL", "OFFSET", "ON", "OR", "ORDER",
    "OUTER", "RIGHT", "SELECT", "SET", "UPDATE", "VALUES", "WHERE",
];

/// Static information for one compile call: the settings and the caller's parameters.
pub struct Env<'a> {
    pub settings: &'a CompilerSettings,
    params: &'a Params,
}

impl<'a> Env<'a> {
    pub fn new(settings: &'a CompilerSettings, params: &'a Params) -> Env<'a> {
        Env { settings, params }
    }

    /// Replace a placeholder with its bound value. Other values are returned as they are.
    pub fn bind(&self, value: Value) -> Result<Value, Error> {
        match value {
            Value::Placeholder { placeholder } => match self.params.get(&placeholder) {
                Some(Value::Placeholder { .. }) | None => Err(Error::MissingBinding(placeholder)),
                Some(bound) => Ok(bound.clone()),
            },
            value => Ok(value),
        }
    }
}

/// A position in the token stream.
///
/// Parsers take the cursor by mutable reference and advance it as they consume tokens;
/// it is the only parsing state there is.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Cursor<'a> {
        Cursor {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    pub fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    pub fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    pub fn at(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Consume the keyword if it is next.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.position += 1;
        }
        found
    }

    /// Consume the token if it is next.
    pub fn eat(&mut self, expected: &Token) -> bool {
        let found = self.at(expected);
        if found {
            self.position += 1;
        }
        found
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<(), Error> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(Error::MalformedClause(format!(
                "expected {keyword}, found {}",
                self.describe_next()
            )))
        }
    }

    pub fn expect(&mut self, expected: &Token) -> Result<(), Error> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(Error::MalformedClause(format!(
                "expected '{expected}', found {}",
                self.describe_next()
            )))
        }
    }

    /// Consume a table, column or alias name.
    pub fn expect_identifier(&mut self) -> Result<String, Error> {
        match self.next_token() {
            Some(Token::Word(word)) if !is_reserved(word) => Ok(word.clone()),
            Some(Token::Identifier(name) | Token::Quoted(name)) => Ok(name.clone()),
            Some(token) => Err(Error::UnexpectedToken(token.to_string())),
            None => Err(Error::MalformedClause(
                "expected a name, found the end of the statement".to_string(),
            )),
        }
    }

    /// Consume a single literal or placeholder token.
    pub fn expect_value(&mut self) -> Result<&'a Token, Error> {
        match self.next_token() {
            Some(token @ (Token::Word(_) | Token::Quoted(_))) => Ok(token),
            Some(token) => Err(Error::UnexpectedToken(token.to_string())),
            None => Err(Error::MalformedClause(
                "expected a value, found the end of the statement".to_string(),
            )),
        }
    }

    /// Fail unless every token has been consumed.
    pub fn expect_end(&self) -> Result<(), Error> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(Error::UnexpectedToken(token.to_string())),
        }
    }

    fn describe_next(&self) -> String {
        match self.peek() {
            Some(token) => format!("'{token}'"),
            None => "the end of the statement".to_string(),
        }
    }
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Consume an optional alias after a table name: `AS alias` or a bare non-reserved word.
pub fn parse_optional_alias(cursor: &mut Cursor) -> Result<Option<String>, Error> {
    if cursor.eat_keyword("AS") {
        return cursor.expect_identifier().map(Some);
    }
    match cursor.peek() {
        Some(Token::Word(word)) if !is_reserved(word) => {
            cursor.next_token();
            Ok(Some(word.clone()))
        }
        Some(Token::Identifier(name)) => {
            cursor.next_token();
            Ok(Some(name.clone()))
        }
        _ => Ok(None),
    }
}

/// A table named in a FROM or JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    pub name: String,
    pub alias: Option<String>,
}

impl TableReference {
    pub fn parse(cursor: &mut Cursor) -> Result<TableReference, Error> {
        let name = cursor.expect_identifier()?;
        let alias = parse_optional_alias(cursor)?;
        Ok(TableReference { name, alias })
    }

    /// Whether `qualifier` names this table, by name or alias.
    pub fn is_named(&self, qualifier: &str) -> bool {
        self.name.eq_ignore_ascii_case(qualifier)
            || self
                .alias
                .as_deref()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::tokenizer::tokenize;

    #[test]
    fn binds_placeholders_from_params() {
        let settings = CompilerSettings::default();
        let params = Params::from([("a".to_string(), Value::Int(5))]);
        let env = Env::new(&settings, &params);

        assert_eq!(
            env.bind(Value::Placeholder {
                placeholder: "a".to_string()
            }),
            Ok(Value::Int(5))
        );
        assert_eq!(
            env.bind(Value::Placeholder {
                placeholder: "b".to_string()
            }),
            Err(Error::MissingBinding("b".to_string()))
        );
        assert_eq!(env.bind(Value::Bool(true)), Ok(Value::Bool(true)));
    }

    #[test]
    fn table_aliases_stop_at_reserved_words() {
        let tokens = tokenize("users u WHERE").unwrap();
        let mut cursor = Cursor::new(&tokens);
        let table = TableReference::parse(&mut cursor).unwrap();
        assert_eq!(table.alias.as_deref(), Some("u"));
        assert!(cursor.at_keyword("where"));

        let tokens = tokenize("users WHERE").unwrap();
        let mut cursor = Cursor::new(&tokens);
        let table = TableReference::parse(&mut cursor).unwrap();
        assert_eq!(table.alias, None);
        assert!(table.is_named("USERS"));
    }
}
