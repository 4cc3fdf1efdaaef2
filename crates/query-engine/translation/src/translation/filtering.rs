//! Handle filtering/where clauses translation.
//!
//! A WHERE clause is parsed by recursive descent into a flat sequence of terms separated
//! by connectives, `[term, connective, term, ...]`, where a parenthesised sub-clause is a
//! single term. The sequence is then folded left to right: consecutive terms joined by the
//! same connective share one group, and a change of connective wraps everything folded so
//! far as the first child of a new group.
//!
//! There is no precedence between AND and OR. `a AND b OR c` is `(a AND b) OR c`, and
//! `a OR b AND c` is `(a OR b) AND c`. Callers that need the conventional reading must
//! parenthesise.

use query_engine_descriptor::descriptor::{Logic, Operator, PredicateNode, Value};

use super::error::Error;
use super::helpers::{Cursor, Env};
use super::tokenizer::Token;
use super::values;

/// Keywords that end a WHERE clause.
const CLAUSE_BOUNDARIES: &[&str] = &["ORDER", "LIMIT", "GROUP"];

/// Translate a WHERE clause, leaving the cursor on the first token after it.
pub fn translate_predicate(env: &Env, cursor: &mut Cursor) -> Result<PredicateNode, Error> {
    let predicate = translate_sequence(env, cursor, 0)?;
    match cursor.peek() {
        Some(Token::RightParen) => Err(Error::UnexpectedToken(")".to_string())),
        _ => Ok(predicate),
    }
}

/// Parse terms and connectives until a `)`, a clause boundary or the end of input.
fn translate_sequence(
    env: &Env,
    cursor: &mut Cursor,
    depth: usize,
) -> Result<PredicateNode, Error> {
    let first = translate_term(env, cursor, depth)?;
    let mut rest = vec![];

    while let Some(token) = cursor.peek() {
        if *token == Token::RightParen || is_clause_boundary(token) {
            break;
        }
        let logic = connective(token).ok_or_else(|| Error::UnexpectedToken(token.to_string()))?;
        cursor.next_token();
        rest.push((logic, translate_term(env, cursor, depth)?));
    }

    Ok(fold(first, rest))
}

/// Parse a single condition or a parenthesised sub-clause.
fn translate_term(env: &Env, cursor: &mut Cursor, depth: usize) -> Result<PredicateNode, Error> {
    match cursor.next_token() {
        Some(Token::LeftParen) => {
            let depth = depth + 1;
            if depth > env.settings.max_predicate_depth {
                return Err(Error::MalformedClause(format!(
                    "parentheses nested deeper than {} levels",
                    env.settings.max_predicate_depth
                )));
            }
            if cursor.at(&Token::RightParen) {
                return Err(Error::MalformedClause("empty parentheses".to_string()));
            }
            let inner = translate_sequence(env, cursor, depth)?;
            if cursor.eat(&Token::RightParen) {
                Ok(inner)
            } else {
                Err(Error::MalformedClause("unbalanced parentheses".to_string()))
            }
        }
        Some(token @ Token::Word(field)) if connective(token).is_none() => {
            translate_condition(env, cursor, field)
        }
        Some(Token::Identifier(field) | Token::Quoted(field)) => {
            translate_condition(env, cursor, field)
        }
        Some(token) => Err(Error::UnexpectedToken(token.to_string())),
        None => Err(Error::MalformedClause(
            "expected a condition, found the end of the statement".to_string(),
        )),
    }
}

/// Parse the operator and operand following a field name.
fn translate_condition(
    env: &Env,
    cursor: &mut Cursor,
    field: &str,
) -> Result<PredicateNode, Error> {
    match cursor.next_token() {
        Some(Token::Symbol(symbol)) => {
            let operator = Operator::from_symbol(symbol)
                .ok_or_else(|| Error::UnexpectedToken(symbol.clone()))?;
            let value = values::translate_value(env, cursor.expect_value()?)?;
            Ok(PredicateNode::Comparison {
                field: field.to_string(),
                operator,
                value,
            })
        }
        Some(token) if token.is_keyword("LIKE") => {
            let pattern = match values::translate_value(env, cursor.expect_value()?)? {
                Value::Str(pattern) => pattern,
                Value::Null => {
                    return Err(Error::MalformedClause(format!(
                        "LIKE pattern for {field} must not be NULL"
                    )))
                }
                other => other.to_string(),
            };
            Ok(PredicateNode::Pattern {
                field: field.to_string(),
                regex: like_to_regex(&pattern),
                case_insensitive: env.settings.case_insensitive_like,
            })
        }
        Some(token) => Err(Error::UnexpectedToken(token.to_string())),
        None => Err(Error::MalformedClause(format!(
            "expected an operator after {field}"
        ))),
    }
}

fn connective(token: &Token) -> Option<Logic> {
    match token {
        Token::Word(text) | Token::Symbol(text) => Logic::from_connective(text),
        _ => None,
    }
}

fn is_clause_boundary(token: &Token) -> bool {
    CLAUSE_BOUNDARIES
        .iter()
        .any(|keyword| token.is_keyword(keyword))
}

/// The state of the left-to-right fold.
enum Folded {
    Single(PredicateNode),
    Open {
        logic: Logic,
        children: Vec<PredicateNode>,
    },
}

impl Folded {
    fn push(self, logic: Logic, term: PredicateNode) -> Folded {
        match self {
            Folded::Open {
                logic: open,
                mut children,
            } if open == logic => {
                children.push(term);
                Folded::Open { logic, children }
            }
            folded => Folded::Open {
                logic,
                children: vec![folded.into_node(), term],
            },
        }
    }

    fn into_node(self) -> PredicateNode {
        match self {
            Folded::Single(node) => node,
            Folded::Open { logic, children } => PredicateNode::Group { logic, children },
        }
    }
}

/// Fold `first (connective term)*` in encounter order.
fn fold(first: PredicateNode, rest: Vec<(Logic, PredicateNode)>) -> PredicateNode {
    rest.into_iter()
        .fold(Folded::Single(first), |folded, (logic, term)| {
            folded.push(logic, term)
        })
        .into_node()
}

/// One element of a LIKE pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikePiece {
    /// `%`
    AnyRun,
    /// `_`
    AnyOne,
    Literal(char),
}

/// Split a LIKE pattern into wildcards and literal characters. A backslash makes the
/// following `%`, `_` or `\` literal; before anything else it is a literal backslash.
fn like_pieces(pattern: &str) -> Vec<LikePiece> {
    let mut pieces = vec![];
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        let piece = match c {
            '\\' => match chars.peek() {
                Some(&escaped) if matches!(escaped, '%' | '_' | '\\') => {
                    chars.next();
                    LikePiece::Literal(escaped)
                }
                _ => LikePiece::Literal('\\'),
            },
            '%' => LikePiece::AnyRun,
            '_' => LikePiece::AnyOne,
            c => LikePiece::Literal(c),
        };
        pieces.push(piece);
    }
    pieces
}

/// Translate a LIKE pattern into an equivalent regular expression.
///
/// The regex is anchored with `^` unless the pattern starts with `%` and with `$` unless it
/// ends with `%`. Inner `%` and `_` become `.*` and `.`; everything else, escaped wildcards
/// included, matches literally.
pub fn like_to_regex(pattern: &str) -> String {
    let mut pieces = like_pieces(pattern);
    let open_start = pieces.first() == Some(&LikePiece::AnyRun);
    if open_start {
        pieces.remove(0);
    }
    let open_end = pieces.last() == Some(&LikePiece::AnyRun) || (open_start && pieces.is_empty());
    if open_end {
        pieces.pop();
    }

    let mut regex = String::with_capacity(pattern.len() + 2);
    if !open_start {
        regex.push('^');
    }
    for piece in pieces {
        match piece {
            LikePiece::AnyRun => regex.push_str(".*"),
            LikePiece::AnyOne => regex.push('.'),
            LikePiece::Literal(
                c @ ('\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^'
                | '$'),
            ) => {
                regex.push('\\');
                regex.push(c);
            }
            LikePiece::Literal(c) => regex.push(c),
        }
    }
    if !open_end {
        regex.push('$');
    }
    regex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::tokenizer::tokenize;
    use query_compiler_configuration::CompilerSettings;
    use query_engine_descriptor::descriptor::Params;
    use similar_asserts::assert_eq;

    fn leaf(field: &str) -> PredicateNode {
        PredicateNode::Comparison {
            field: field.to_string(),
            operator: Operator::Eq,
            value: Value::Int(1),
        }
    }

    fn parse(clause: &str) -> Result<PredicateNode, Error> {
        let settings = CompilerSettings::default();
        let params = Params::new();
        let env = Env::new(&settings, &params);
        let tokens = tokenize(clause)?;
        let mut cursor = Cursor::new(&tokens);
        let predicate = translate_predicate(&env, &mut cursor)?;
        cursor.expect_end()?;
        Ok(predicate)
    }

    #[test]
    fn same_connectives_share_one_group() {
        assert_eq!(
            parse("a=1 AND b=1 AND c=1").unwrap(),
            PredicateNode::Group {
                logic: Logic::And,
                children: vec![leaf("a"), leaf("b"), leaf("c")],
            }
        );
    }

    #[test]
    fn mixed_connectives_group_in_encounter_order() {
        assert_eq!(
            parse("a=1 OR b=1 AND c=1").unwrap(),
            PredicateNode::Group {
                logic: Logic::And,
                children: vec![
                    PredicateNode::Group {
                        logic: Logic::Or,
                        children: vec![leaf("a"), leaf("b")],
                    },
                    leaf("c"),
                ],
            }
        );
        assert_eq!(
            parse("a=1 && b=1 || c=1 || d=1").unwrap(),
            PredicateNode::Group {
                logic: Logic::Or,
                children: vec![
                    PredicateNode::Group {
                        logic: Logic::And,
                        children: vec![leaf("a"), leaf("b")],
                    },
                    leaf("c"),
                    leaf("d"),
                ],
            }
        );
    }

    #[test]
    fn parentheses_form_a_single_term() {
        assert_eq!(
            parse("a=1 AND (b=1 OR c=1)").unwrap(),
            PredicateNode::Group {
                logic: Logic::And,
                children: vec![
                    leaf("a"),
                    PredicateNode::Group {
                        logic: Logic::Or,
                        children: vec![leaf("b"), leaf("c")],
                    },
                ],
            }
        );
        // a parenthesised group is kept even when its connective matches
        assert_eq!(
            parse("(a=1 AND b=1) AND c=1").unwrap(),
            PredicateNode::Group {
                logic: Logic::And,
                children: vec![
                    PredicateNode::Group {
                        logic: Logic::And,
                        children: vec![leaf("a"), leaf("b")],
                    },
                    leaf("c"),
                ],
            }
        );
    }

    #[test]
    fn a_single_condition_is_never_wrapped() {
        assert_eq!(parse("((a = 1))").unwrap(), leaf("a"));
    }

    #[test]
    fn unbalanced_parentheses_are_rejected() {
        assert_eq!(
            parse("(a=1 AND b=1"),
            Err(Error::MalformedClause("unbalanced parentheses".to_string()))
        );
        assert_eq!(
            parse("a=1) AND b=1"),
            Err(Error::UnexpectedToken(")".to_string()))
        );
        assert!(matches!(parse("()"), Err(Error::MalformedClause(_))));
    }

    #[test]
    fn stray_tokens_are_rejected() {
        assert_eq!(
            parse("a=1 b=1"),
            Err(Error::UnexpectedToken("b".to_string()))
        );
        assert_eq!(
            parse("AND a=1"),
            Err(Error::UnexpectedToken("AND".to_string()))
        );
        assert_eq!(parse("a => 1"), Err(Error::UnexpectedToken("=>".to_string())));
        assert!(matches!(parse("a=1 AND"), Err(Error::MalformedClause(_))));
    }

    #[test]
    fn nesting_is_limited() {
        let settings = CompilerSettings {
            max_predicate_depth: 2,
            ..CompilerSettings::default()
        };
        let params = Params::new();
        let env = Env::new(&settings, &params);

        let tokens = tokenize("((a=1))").unwrap();
        assert!(translate_predicate(&env, &mut Cursor::new(&tokens)).is_ok());

        let tokens = tokenize("(((a=1)))").unwrap();
        assert!(matches!(
            translate_predicate(&env, &mut Cursor::new(&tokens)),
            Err(Error::MalformedClause(_))
        ));
    }

    #[test]
    fn like_becomes_a_case_insensitive_pattern() {
        assert_eq!(
            parse("name LIKE 'jo%'").unwrap(),
            PredicateNode::Pattern {
                field: "name".to_string(),
                regex: "^jo".to_string(),
                case_insensitive: true,
            }
        );
    }

    #[test]
    fn like_patterns_translate_to_anchored_regexes() {
        assert_eq!(like_to_regex("%smith"), "smith$");
        assert_eq!(like_to_regex("smith%"), "^smith");
        assert_eq!(like_to_regex("%smith%"), "smith");
        assert_eq!(like_to_regex("smith"), "^smith$");
        assert_eq!(like_to_regex("a_c%d.e"), "^a.c.*d\\.e$");
        assert_eq!(like_to_regex("%"), "");
        assert_eq!(like_to_regex(""), "^$");
    }

    #[test]
    fn escaped_wildcards_match_literally() {
        assert_eq!(like_to_regex(r"100\%"), r"^100%$");
        assert_eq!(like_to_regex(r"%\_id"), r"_id$");
        assert_eq!(like_to_regex(r"a\\%"), r"^a\\");
        assert_eq!(like_to_regex(r"C:\temp%"), r"^C:\\temp");
        assert_eq!(
            parse(r"code LIKE '100\%'").unwrap(),
            PredicateNode::Pattern {
                field: "code".to_string(),
                regex: "^100%$".to_string(),
                case_insensitive: true,
            }
        );
    }

    #[test]
    fn quoted_fields_are_accepted() {
        assert_eq!(parse(r#""a" = 1"#).unwrap(), leaf("a"));
        assert_eq!(parse("`a` = 1").unwrap(), leaf("a"));
        assert_eq!(parse(r#""t"."a" = 1"#).unwrap(), leaf("t.a"));
    }
}
