//! Raw tokens straight out of `logos`, trivia included.
//!
//! Conversion to `TokenKind` (dropping trivia, merging `!in` / `!is` /
//! `as?`) happens in `lib.rs`.

use logos::{Lexer, Logos};

use crate::lex_error::LexErrorKind;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
pub(crate) enum RawToken {
    // Trivia
    #[regex(r"[ \t\r\x0C]+")]
    Whitespace,
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // Hard keywords
    #[token("as")]
    As,
    #[token("break")]
    Break,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("fun")]
    Fun,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("interface")]
    Interface,
    #[token("is")]
    Is,
    #[token("null")]
    Null,
    #[token("object")]
    Object,
    #[token("package")]
    Package,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("typealias")]
    TypeAlias,
    #[token("typeof")]
    TypeOf,
    #[token("val")]
    Val,
    #[token("var")]
    Var,
    #[token("when")]
    When,
    #[token("while")]
    While,

    // Identifiers
    #[regex(r"[a-zA-Z_\p{L}][a-zA-Z0-9_\p{L}\p{Nd}]*")]
    #[regex(r"`[^`\r\n]+`")]
    Identifier,

    // Literals
    #[regex(r"[0-9][0-9_]*[uU]?L?")]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*[uU]?L?")]
    #[regex(r"0[bB][01][01_]*[uU]?L?")]
    Integer,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fF]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[fF]?")]
    #[regex(r"[0-9][0-9_]*[fF]")]
    Float,

    #[regex(r"'([^'\\\r\n]|\\[tbnr'\x22\\$]|\\u[0-9a-fA-F]{4})'")]
    Character,

    #[token("\"", string_literal)]
    String,

    #[token("\"\"\"", raw_string_literal)]
    RawString,

    // Punctuation
    #[token("@")]
    At,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token("?.")]
    SafeAccess,
    #[token("?:")]
    Elvis,
    #[token("?")]
    Question,
    #[token("->")]
    Arrow,
    #[token("=>")]
    DoubleArrow,
    #[token("..")]
    Range,
    #[token("..<")]
    RangeUntil,
    #[token("#")]
    Hash,
    #[token("$")]
    Dollar,

    // Operators
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    ExclEq,
    #[token("!==")]
    ExclEqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("%")]
    Perc,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("!")]
    Excl,
    #[token("!!")]
    ExclExcl,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("&")]
    Amp,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    MulEq,
    #[token("/=")]
    DivEq,
    #[token("%=")]
    PercEq,
}

/// Kotlin block comments nest.
fn block_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        match (rest[i], rest.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return Ok(());
                }
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedComment)
}

fn string_literal(lex: &mut Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    match scan_string_body(lex.remainder().as_bytes()) {
        Ok(len) => {
            lex.bump(len);
            Ok(())
        }
        Err(len) => {
            lex.bump(len);
            Err(LexErrorKind::UnterminatedString)
        }
    }
}

fn raw_string_literal(lex: &mut Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    match rest.find("\"\"\"") {
        Some(close) => {
            // `""""x""""` ends with extra quotes that belong to the content.
            let extra = rest[close + 3..].bytes().take_while(|&b| b == b'"').count();
            lex.bump(close + 3 + extra);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedRawString)
        }
    }
}

/// Scan a single-line string body after the opening quote.
///
/// `Ok(len)` includes the closing quote. `Err(len)` is how far the broken
/// literal extends (up to, not including, the line break).
fn scan_string_body(rest: &[u8]) -> Result<usize, usize> {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'"' => return Ok(i + 1),
            b'\n' => return Err(i),
            b'\\' if rest.get(i + 1).is_some_and(|&b| b != b'\n') => i += 2,
            b'$' if rest.get(i + 1) == Some(&b'{') => i = scan_template(rest, i + 2)?,
            _ => i += 1,
        }
    }
    Err(rest.len())
}

/// Scan a `${ ... }` template entry starting just after `${`; returns the
/// index just past the matching `}`.
fn scan_template(rest: &[u8], start: usize) -> Result<usize, usize> {
    let mut depth = 1usize;
    let mut i = start;
    while i < rest.len() {
        match rest[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            b'"' => {
                let nested = scan_string_body(&rest[i + 1..]).map_err(|len| i + 1 + len)?;
                i += 1 + nested;
            }
            b'\n' => return Err(i),
            _ => i += 1,
        }
    }
    Err(rest.len())
}
