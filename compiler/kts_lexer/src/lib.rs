//! Kotlin tokenizer using logos.
//!
//! Produces a [`TokenList`] of significant tokens. Whitespace, newlines and
//! comments are trivia: they never become tokens but are recorded in the
//! [`TokenFlags`] of the token that follows them, so a parser that stops
//! before token `n` has consumed every byte up to `tokens[n].span.start`.

mod lex_error;
mod raw_token;

use logos::Logos;

use kts_ir::{Span, Token, TokenFlags, TokenKind, TokenList};

pub use lex_error::{LexError, LexErrorKind};
use raw_token::RawToken;

/// Result of lexing a source text.
#[derive(Clone, Debug, Default)]
pub struct Lexed {
    pub tokens: TokenList,
    /// One entry per `TokenKind::Error` token, in source order.
    pub errors: Vec<LexError>,
}

impl Lexed {
    /// The fault recorded for the error token starting at `offset`, if any.
    pub fn error_at(&self, offset: u32) -> Option<&LexError> {
        self.errors.iter().find(|error| error.span.start == offset)
    }
}

/// Lex `source` into significant tokens, terminated by `Eof`.
///
/// # Panics
/// Panics if `source` is longer than `u32::MAX` bytes.
pub fn lex(source: &str) -> Lexed {
    let mut tokens = TokenList::new(source);
    let mut errors = Vec::new();
    let mut pending = TokenFlags::empty();
    let mut raw_lexer = RawToken::lexer(source);

    while let Some(result) = raw_lexer.next() {
        let span = Span::from_range(raw_lexer.span());
        let flags = std::mem::take(&mut pending);

        match result {
            Ok(RawToken::Whitespace) => pending = flags | TokenFlags::SPACE_BEFORE,
            Ok(RawToken::Newline) => pending = flags | TokenFlags::NEWLINE_BEFORE,
            Ok(RawToken::LineComment) => pending = flags | TokenFlags::TRIVIA_BEFORE,
            Ok(RawToken::BlockComment) => {
                let mut flags = flags | TokenFlags::TRIVIA_BEFORE;
                if raw_lexer.slice().contains('\n') {
                    flags |= TokenFlags::NEWLINE_BEFORE;
                }
                pending = flags;
            }
            Ok(raw) => push_significant(&mut tokens, convert(raw), span, flags),
            Err(kind) => {
                errors.push(LexError::new(kind, span));
                tokens.push(Token::new(TokenKind::Error, span, flags));
            }
        }
    }

    let eof = Span::from_range(source.len()..source.len());
    tokens.push(Token::new(TokenKind::Eof, eof, pending));

    Lexed { tokens, errors }
}

/// Push a token, merging `!in`, `!is` and `as?` when their parts touch.
fn push_significant(tokens: &mut TokenList, kind: TokenKind, span: Span, flags: TokenFlags) {
    let adjacent_previous = flags
        .is_empty()
        .then(|| tokens.len().checked_sub(1))
        .flatten()
        .map(|index| tokens[index])
        .filter(|previous| previous.span.end == span.start);

    let merged = adjacent_previous.and_then(|previous| match (previous.kind, kind) {
        (TokenKind::Excl, TokenKind::In) => Some((previous, TokenKind::NotIn)),
        (TokenKind::Excl, TokenKind::Is) => Some((previous, TokenKind::NotIs)),
        (TokenKind::As, TokenKind::Question) => Some((previous, TokenKind::AsSafe)),
        _ => None,
    });

    match merged {
        Some((previous, merged_kind)) => {
            tokens.pop();
            tokens.push(Token::new(
                merged_kind,
                previous.span.merge(span),
                previous.flags,
            ));
        }
        None => tokens.push(Token::new(kind, span, flags)),
    }
}

fn convert(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::As => TokenKind::As,
        RawToken::Break => TokenKind::Break,
        RawToken::Class => TokenKind::Class,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Do => TokenKind::Do,
        RawToken::Else => TokenKind::Else,
        RawToken::False => TokenKind::False,
        RawToken::For => TokenKind::For,
        RawToken::Fun => TokenKind::Fun,
        RawToken::If => TokenKind::If,
        RawToken::In => TokenKind::In,
        RawToken::Interface => TokenKind::Interface,
        RawToken::Is => TokenKind::Is,
        RawToken::Null => TokenKind::Null,
        RawToken::Object => TokenKind::Object,
        RawToken::Package => TokenKind::Package,
        RawToken::Return => TokenKind::Return,
        RawToken::Super => TokenKind::Super,
        RawToken::This => TokenKind::This,
        RawToken::Throw => TokenKind::Throw,
        RawToken::True => TokenKind::True,
        RawToken::Try => TokenKind::Try,
        RawToken::TypeAlias => TokenKind::TypeAlias,
        RawToken::TypeOf => TokenKind::TypeOf,
        RawToken::Val => TokenKind::Val,
        RawToken::Var => TokenKind::Var,
        RawToken::When => TokenKind::When,
        RawToken::While => TokenKind::While,

        RawToken::Identifier => TokenKind::Identifier,
        RawToken::Integer => TokenKind::IntegerLiteral,
        RawToken::Float => TokenKind::FloatLiteral,
        RawToken::Character => TokenKind::CharacterLiteral,
        RawToken::String => TokenKind::StringLiteral,
        RawToken::RawString => TokenKind::RawStringLiteral,

        RawToken::At => TokenKind::At,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::SafeAccess => TokenKind::SafeAccess,
        RawToken::Elvis => TokenKind::Elvis,
        RawToken::Question => TokenKind::Question,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::DoubleArrow => TokenKind::DoubleArrow,
        RawToken::Range => TokenKind::Range,
        RawToken::RangeUntil => TokenKind::RangeUntil,
        RawToken::Hash => TokenKind::Hash,
        RawToken::Dollar => TokenKind::Dollar,

        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::ExclEq => TokenKind::ExclEq,
        RawToken::ExclEqEq => TokenKind::ExclEqEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Mul => TokenKind::Mul,
        RawToken::Div => TokenKind::Div,
        RawToken::Perc => TokenKind::Perc,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::Excl => TokenKind::Excl,
        RawToken::ExclExcl => TokenKind::ExclExcl,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::Amp => TokenKind::Amp,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::MulEq => TokenKind::MulEq,
        RawToken::DivEq => TokenKind::DivEq,
        RawToken::PercEq => TokenKind::PercEq,

        RawToken::Whitespace
        | RawToken::Newline
        | RawToken::LineComment
        | RawToken::BlockComment => {
            unreachable!("trivia is folded into token flags before conversion")
        }
    }
}

#[cfg(test)]
mod tests;
