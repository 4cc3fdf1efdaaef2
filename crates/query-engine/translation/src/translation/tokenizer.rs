//! Split statement text into tokens in a single pass.
//!
//! Parentheses, commas and semicolons are always tokens of their own, even when glued to
//! the surrounding text, so `(id<1` scans as `(`, `id`, `<`, `1`. Quoted literals are
//! kept whole, which keeps LIKE patterns containing spaces in one piece.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::error::Error;

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// A run of operator characters, such as `<=`, `<>` or `&&`.
    Symbol(String),
    /// A quoted string literal, without its quotes.
    Quoted(String),
    /// A backtick-quoted identifier or a qualified name with a quoted part, without quotes.
    Identifier(String),
    /// Anything else: keywords, bare identifiers, numbers, placeholders.
    Word(String),
}

impl Token {
    /// Whether this token is the given keyword, ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(word) if word.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Symbol(symbol) => write!(f, "{symbol}"),
            Token::Quoted(text) => write!(f, "'{text}'"),
            Token::Identifier(name) => write!(f, "`{name}`"),
            Token::Word(word) => write!(f, "{word}"),
        }
    }
}

fn is_symbol_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!' | '&' | '|')
}

fn is_word_char(c: char) -> bool {
    !(c.is_whitespace()
        || is_symbol_char(c)
        || matches!(c, '(' | ')' | ',' | ';' | '\'' | '"' | '`'))
}

/// Read up to the closing `quote`, the opening one already consumed. A doubled quote stands
/// for the quote itself; every other character, backslashes included, is kept as written.
fn read_quoted(chars: &mut Peekable<Chars>, quote: char) -> Result<String, Error> {
    let mut literal = String::new();
    while let Some(next) = chars.next() {
        if next == quote {
            if chars.peek() == Some(&quote) {
                chars.next();
                literal.push(quote);
            } else {
                return Ok(literal);
            }
        } else {
            literal.push(next);
        }
    }
    Err(Error::MalformedClause(format!(
        "unterminated quoted literal {quote}{literal}"
    )))
}

fn read_word(chars: &mut Peekable<Chars>) -> String {
    let mut word = String::new();
    while let Some(&next) = chars.peek() {
        if !is_word_char(next) {
            break;
        }
        word.push(next);
        chars.next();
    }
    word
}

/// Continue a qualified name such as `"orders"."user_id"` or `` `o`.total `` after its
/// first part, joining the parts with `.` and dropping their quotes.
fn read_qualified_tail(chars: &mut Peekable<Chars>, name: &mut String) -> Result<(), Error> {
    loop {
        if chars.peek() == Some(&'.') {
            chars.next();
            name.push('.');
        } else if !name.ends_with('.') {
            return Ok(());
        }
        match chars.peek() {
            Some(&quote) if quote == '"' || quote == '`' => {
                chars.next();
                name.push_str(&read_quoted(chars, quote)?);
            }
            Some(&c) if is_word_char(c) => name.push_str(&read_word(chars)),
            _ => {
                return Err(Error::MalformedClause(format!(
                    "expected a name after {name}"
                )))
            }
        }
    }
}

/// Tokenize a statement.
pub fn tokenize(text: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = vec![];
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semicolon);
            }
            '\'' => {
                chars.next();
                tokens.push(Token::Quoted(read_quoted(&mut chars, c)?));
            }
            '"' | '`' => {
                chars.next();
                let mut name = read_quoted(&mut chars, c)?;
                if chars.peek() == Some(&'.') {
                    read_qualified_tail(&mut chars, &mut name)?;
                    tokens.push(Token::Identifier(name));
                } else if c == '`' {
                    tokens.push(Token::Identifier(name));
                } else {
                    tokens.push(Token::Quoted(name));
                }
            }
            c if is_symbol_char(c) => {
                let mut symbol = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_symbol_char(next) {
                        break;
                    }
                    symbol.push(next);
                    chars.next();
                }
                tokens.push(Token::Symbol(symbol));
            }
            _ => {
                let mut word = read_word(&mut chars);
                if word.ends_with('.') && matches!(chars.peek(), Some('"' | '`')) {
                    read_qualified_tail(&mut chars, &mut word)?;
                    tokens.push(Token::Identifier(word));
                } else {
                    tokens.push(Token::Word(word));
                }
            }
        }
    }

    Ok(tokens)
}
