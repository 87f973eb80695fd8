//! Token types for the Kotlin subset the scanner understands.
//!
//! Tokens carry no payload: literal values are never needed to recognize
//! annotations, and the text of any token is recovered from its [`Span`].

use std::ops::Index;

use bitflags::bitflags;

use crate::Span;

/// Kind of a significant (non-trivia) token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntegerLiteral,
    FloatLiteral,
    CharacterLiteral,
    StringLiteral,
    RawStringLiteral,

    /// Plain or backticked identifier. Soft keywords (`file`, `get`,
    /// `suspend`, `out`, ...) are identifiers too.
    Identifier,

    // Hard keywords
    As,
    Break,
    Class,
    Continue,
    Do,
    Else,
    False,
    For,
    Fun,
    If,
    In,
    Interface,
    Is,
    Null,
    Object,
    Package,
    Return,
    Super,
    This,
    Throw,
    True,
    Try,
    TypeAlias,
    TypeOf,
    Val,
    Var,
    When,
    While,

    // Merged from adjacent raw tokens
    /// `as?`
    AsSafe,
    /// `!in`
    NotIn,
    /// `!is`
    NotIs,

    // Punctuation
    At,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    ColonColon,
    Dot,
    /// `?.`
    SafeAccess,
    /// `?:`
    Elvis,
    Question,
    /// `->`
    Arrow,
    /// `=>`
    DoubleArrow,
    /// `..`
    Range,
    /// `..<`
    RangeUntil,
    Hash,
    Dollar,

    // Operators
    Eq,
    EqEq,
    EqEqEq,
    ExclEq,
    ExclEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Mul,
    Div,
    Perc,
    PlusPlus,
    MinusMinus,
    Excl,
    ExclExcl,
    AndAnd,
    OrOr,
    Amp,
    PlusEq,
    MinusEq,
    MulEq,
    DivEq,
    PercEq,

    /// Input the lexer could not tokenize. See `kts_lexer::LexError`.
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable name for diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::CharacterLiteral => "character literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::RawStringLiteral => "raw string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::As => "`as`",
            TokenKind::Break => "`break`",
            TokenKind::Class => "`class`",
            TokenKind::Continue => "`continue`",
            TokenKind::Do => "`do`",
            TokenKind::Else => "`else`",
            TokenKind::False => "`false`",
            TokenKind::For => "`for`",
            TokenKind::Fun => "`fun`",
            TokenKind::If => "`if`",
            TokenKind::In => "`in`",
            TokenKind::Interface => "`interface`",
            TokenKind::Is => "`is`",
            TokenKind::Null => "`null`",
            TokenKind::Object => "`object`",
            TokenKind::Package => "`package`",
            TokenKind::Return => "`return`",
            TokenKind::Super => "`super`",
            TokenKind::This => "`this`",
            TokenKind::Throw => "`throw`",
            TokenKind::True => "`true`",
            TokenKind::Try => "`try`",
            TokenKind::TypeAlias => "`typealias`",
            TokenKind::TypeOf => "`typeof`",
            TokenKind::Val => "`val`",
            TokenKind::Var => "`var`",
            TokenKind::When => "`when`",
            TokenKind::While => "`while`",
            TokenKind::AsSafe => "`as?`",
            TokenKind::NotIn => "`!in`",
            TokenKind::NotIs => "`!is`",
            TokenKind::At => "`@`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Dot => "`.`",
            TokenKind::SafeAccess => "`?.`",
            TokenKind::Elvis => "`?:`",
            TokenKind::Question => "`?`",
            TokenKind::Arrow => "`->`",
            TokenKind::DoubleArrow => "`=>`",
            TokenKind::Range => "`..`",
            TokenKind::RangeUntil => "`..<`",
            TokenKind::Hash => "`#`",
            TokenKind::Dollar => "`$`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::EqEqEq => "`===`",
            TokenKind::ExclEq => "`!=`",
            TokenKind::ExclEqEq => "`!==`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::LtEq => "`<=`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Mul => "`*`",
            TokenKind::Div => "`/`",
            TokenKind::Perc => "`%`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::Excl => "`!`",
            TokenKind::ExclExcl => "`!!`",
            TokenKind::AndAnd => "`&&`",
            TokenKind::OrOr => "`||`",
            TokenKind::Amp => "`&`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::MulEq => "`*=`",
            TokenKind::DivEq => "`/=`",
            TokenKind::PercEq => "`%=`",
            TokenKind::Error => "malformed input",
            TokenKind::Eof => "end of input",
        }
    }
}

bitflags! {
    /// Trivia that preceded a token.
    ///
    /// Whitespace and comments never become tokens; they are attached to
    /// the following token as flags so the parser can still see line
    /// structure.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TokenFlags: u8 {
        /// Spaces or tabs preceded this token.
        const SPACE_BEFORE = 1 << 0;
        /// A newline preceded this token.
        const NEWLINE_BEFORE = 1 << 1;
        /// A comment preceded this token.
        const TRIVIA_BEFORE = 1 << 2;
    }
}

/// A significant token with its source span.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span, flags: TokenFlags) -> Self {
        Token { kind, span, flags }
    }
}

/// Significant tokens of one source text, always terminated by `Eof`.
///
/// Owns a copy of the source so token text can be recovered from spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    source: String,
    tokens: Vec<Token>,
}

impl TokenList {
    /// Create an empty list over `source`. Callers push tokens and finish
    /// with an `Eof` token.
    pub fn new(source: &str) -> Self {
        TokenList {
            source: source.to_owned(),
            tokens: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    /// Number of tokens including the trailing `Eof`.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// The source text the tokens were produced from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by the token at `index`.
    pub fn text(&self, index: usize) -> &str {
        self.tokens
            .get(index)
            .and_then(|token| self.source.get(token.span.to_range()))
            .unwrap_or("")
    }

    /// Index of the first token whose span starts at or after `offset`.
    ///
    /// Returns the `Eof` index when no such token exists.
    pub fn index_at_offset(&self, offset: u32) -> usize {
        self.tokens
            .partition_point(|token| token.span.start < offset && token.kind != TokenKind::Eof)
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
