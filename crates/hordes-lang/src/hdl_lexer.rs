//! Tokenizer for the Hordes Definition Language.
//!
//! Whitespace, comments and line tracking are handled by the driving loop in
//! [`lex`]; every token proper is recognised by the `winnow` parsers below.

use std::fmt;

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, delimited};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::error::{HdlError, Pos};
use crate::schema::RecordKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Reserved words
    If,
    Else,
    End,
    For,
    Each,
    As,
    In,
    Not,
    And,
    Or,
    Print,

    /// One of the record type names.
    TypeName(RecordKind),
    Ident(String),

    // Literals
    Int(i64),
    Real(f64),
    Str(String),

    // Punctuation
    Dot,
    Colon,
    Semicolon,
    Comma,
    Assign,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,

    // End of input
    Eof,
}

impl Token {
    /// Token class as reported in syntax errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::If
            | Token::Else
            | Token::End
            | Token::For
            | Token::Each
            | Token::As
            | Token::In
            | Token::Not
            | Token::And
            | Token::Or
            | Token::Print => "keyword",
            Token::TypeName(_) => "type name",
            Token::Ident(_) => "identifier",
            Token::Int(_) => "integer",
            Token::Real(_) => "real",
            Token::Str(_) => "string",
            Token::Eof => "end of input",
            _ => "symbol",
        }
    }

    fn keyword(word: &str) -> Option<Token> {
        let tok = match word {
            "if" => Token::If,
            "else" => Token::Else,
            "end" => Token::End,
            "for" => Token::For,
            "each" => Token::Each,
            "as" => Token::As,
            "in" => Token::In,
            "not" => Token::Not,
            "and" => Token::And,
            "or" => Token::Or,
            "print" => Token::Print,
            _ => return None,
        };
        Some(tok)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::If => "if",
            Token::Else => "else",
            Token::End => "end",
            Token::For => "for",
            Token::Each => "each",
            Token::As => "as",
            Token::In => "in",
            Token::Not => "not",
            Token::And => "and",
            Token::Or => "or",
            Token::Print => "print",
            Token::TypeName(kind) => return write!(f, "{kind}"),
            Token::Ident(name) => name.as_str(),
            Token::Int(n) => return write!(f, "{n}"),
            Token::Real(r) => return write!(f, "{r}"),
            Token::Str(s) => return write!(f, "\"{s}\""),
            Token::Dot => ".",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::Assign => "=",
            Token::Eq => "==",
            Token::Ne => "!=",
            Token::Gt => ">",
            Token::Ge => ">=",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Eof => "<eof>",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct Located<T> {
    pub value: T,
    pub line: usize,
    pub col: usize,
}

impl<T> Located<T> {
    pub fn pos(&self) -> Pos {
        Pos::new(self.line, self.col)
    }
}

fn word(input: &mut &str) -> ModalResult<Token> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    )
        .take()
        .map(|w: &str| {
            Token::keyword(w)
                .or_else(|| w.parse::<RecordKind>().ok().map(Token::TypeName))
                .unwrap_or_else(|| Token::Ident(w.to_string()))
        })
        .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<Token> {
    alt((
        (digit0, '.', digit1).take().parse_to().map(Token::Real),
        digit1.parse_to().map(Token::Int),
    ))
    .parse_next(input)
}

fn string(input: &mut &str) -> ModalResult<Token> {
    delimited('"', take_till(0.., '"'), '"')
        .map(|s: &str| Token::Str(s.to_string()))
        .parse_next(input)
}

fn punct(input: &mut &str) -> ModalResult<Token> {
    alt((
        alt((
            "==".value(Token::Eq),
            "!=".value(Token::Ne),
            ">=".value(Token::Ge),
            "<=".value(Token::Le),
        )),
        alt((
            '.'.value(Token::Dot),
            ':'.value(Token::Colon),
            ';'.value(Token::Semicolon),
            ','.value(Token::Comma),
            '='.value(Token::Assign),
            '>'.value(Token::Gt),
            '<'.value(Token::Lt),
            '+'.value(Token::Plus),
            '-'.value(Token::Minus),
            '*'.value(Token::Star),
            '/'.value(Token::Slash),
            '('.value(Token::LParen),
            ')'.value(Token::RParen),
            '['.value(Token::LBracket),
            ']'.value(Token::RBracket),
        )),
    ))
    .parse_next(input)
}

fn token(input: &mut &str) -> ModalResult<Token> {
    alt((word, number, string, punct)).parse_next(input)
}

/// Split `source` into located tokens, terminated by [`Token::Eof`].
pub fn lex(source: &str) -> Result<Vec<Located<Token>>, HdlError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1usize;
    let mut line_start = 0usize;

    let col_at = |offset: usize, line_start: usize| source[line_start..offset].chars().count() + 1;

    while let Some(ch) = rest.chars().next() {
        let offset = source.len() - rest.len();
        match ch {
            '\n' => {
                rest = &rest[1..];
                line += 1;
                line_start = offset + 1;
                continue;
            }
            ' ' | '\t' | '\r' => {
                rest = &rest[1..];
                continue;
            }
            '#' => {
                let end = rest.find('\n').unwrap_or(rest.len());
                rest = &rest[end..];
                continue;
            }
            _ => {}
        }

        let col = col_at(offset, line_start);
        let before = rest;
        match token.parse_next(&mut rest) {
            Ok(value) => {
                tokens.push(Located { value, line, col });
                // String literals may span lines.
                let consumed = &before[..before.len() - rest.len()];
                if let Some(last) = consumed.rfind('\n') {
                    line += consumed.matches('\n').count();
                    line_start = offset + last + 1;
                }
            }
            Err(_) => {
                return Err(HdlError::Lex {
                    ch,
                    pos: Pos::new(line, col),
                });
            }
        }
    }

    let col = col_at(source.len(), line_start);
    tokens.push(Located {
        value: Token::Eof,
        line,
        col,
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(source: &str) -> Vec<Token> {
        lex(source)
            .expect("lex")
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn lex_declaration() {
        let toks = values("Horde hs[];");
        assert_eq!(
            toks,
            vec![
                Token::TypeName(RecordKind::Horde),
                Token::Ident("hs".into()),
                Token::LBracket,
                Token::RBracket,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        let toks = values("for each m in hordes-2 as end_if");
        assert!(matches!(toks[0], Token::For));
        assert!(matches!(toks[1], Token::Each));
        assert!(matches!(toks[2], Token::Ident(ref s) if s == "m"));
        assert!(matches!(toks[3], Token::In));
        assert!(matches!(toks[4], Token::Ident(ref s) if s == "hordes-2"));
        assert!(matches!(toks[5], Token::As));
        assert!(matches!(toks[6], Token::Ident(ref s) if s == "end_if"));
    }

    #[test]
    fn lex_numbers() {
        let toks = values("12 3.5 .25 7");
        assert_eq!(toks[0], Token::Int(12));
        assert_eq!(toks[1], Token::Real(3.5));
        assert_eq!(toks[2], Token::Real(0.25));
        assert_eq!(toks[3], Token::Int(7));
    }

    #[test]
    fn lex_indexed_path_is_not_a_real() {
        let toks = values("hs[0].x");
        assert_eq!(toks[2], Token::Int(0));
        assert_eq!(toks[3], Token::RBracket);
        assert_eq!(toks[4], Token::Dot);
    }

    #[test]
    fn lex_comparison_ops() {
        let toks = values("== != < > <= >= =");
        assert_eq!(
            &toks[..7],
            &[
                Token::Eq,
                Token::Ne,
                Token::Lt,
                Token::Gt,
                Token::Le,
                Token::Ge,
                Token::Assign
            ]
        );
    }

    #[test]
    fn lex_strings_keep_content_verbatim() {
        let toks = values(r#"m.name = "The \ pit # of doom";"#);
        assert!(matches!(toks[4], Token::Str(ref s) if s == r"The \ pit # of doom"));
    }

    #[test]
    fn lex_tracks_lines_and_columns() {
        let toks = lex("# heading\n\nMap m;\n\tm.width = 10;").expect("lex");
        assert_eq!((toks[0].line, toks[0].col), (3, 1));
        assert_eq!((toks[1].line, toks[1].col), (3, 5));
        assert_eq!((toks[3].line, toks[3].col), (4, 2));
        assert_eq!((toks[6].line, toks[6].col), (4, 10));
        assert_eq!((toks[7].line, toks[7].col), (4, 12));
    }

    #[test]
    fn lex_multiline_string_advances_line() {
        let toks = lex("print \"a\nb\";\nx").expect("lex");
        assert_eq!(toks[1].line, 1);
        assert_eq!((toks[2].line, toks[2].col), (2, 3));
        assert_eq!((toks[3].line, toks[3].col), (3, 1));
    }

    #[test]
    fn lex_rejects_unknown_character() {
        let err = lex("Map m;\nm.width = 10 @ 2;").unwrap_err();
        assert_eq!(
            err,
            HdlError::Lex {
                ch: '@',
                pos: Pos::new(2, 14)
            }
        );
    }

    #[test]
    fn lex_rejects_unterminated_string() {
        let err = lex("print \"oops;").unwrap_err();
        assert!(matches!(err, HdlError::Lex { ch: '"', .. }));
        assert_eq!(err.pos(), Pos::new(1, 7));
    }
}
