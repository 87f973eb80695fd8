//! Minimal token source for combinator tests.
//!
//! Runs of ASCII letters are identifiers (kind `'w'`); every other
//! non-whitespace character is a token whose kind is the character itself.
//! The stream ends with a `'\0'` token.

use kts_ir::Span;

use crate::TokenSource;

pub(crate) const WORD: char = 'w';
pub(crate) const END: char = '\0';

pub(crate) struct Chars {
    text: String,
    tokens: Vec<(char, Span, bool)>,
}

impl Chars {
    pub(crate) fn new(text: &str) -> Self {
        let mut tokens = Vec::new();
        let mut newline = false;
        let mut chars = text.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c == '\n' {
                newline = true;
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let mut end = start + c.len_utf8();
            let kind = if c.is_ascii_alphabetic() {
                while let Some(&(next, n)) = chars.peek() {
                    if !n.is_ascii_alphabetic() {
                        break;
                    }
                    end = next + n.len_utf8();
                    chars.next();
                }
                WORD
            } else {
                c
            };
            tokens.push((kind, Span::from_range(start..end), newline));
            newline = false;
        }
        tokens.push((END, Span::from_range(text.len()..text.len()), newline));
        Chars {
            text: text.to_owned(),
            tokens,
        }
    }
}

impl TokenSource for Chars {
    type Kind = char;

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn kind(&self, index: usize) -> char {
        self.tokens[index].0
    }

    fn text(&self, index: usize) -> &str {
        &self.text[self.tokens[index].1.to_range()]
    }

    fn span(&self, index: usize) -> Span {
        self.tokens[index].1
    }

    fn is_identifier(&self, index: usize) -> bool {
        self.tokens[index].0 == WORD
    }

    fn newline_before(&self, index: usize) -> bool {
        self.tokens[index].2
    }

    fn describe(kind: char) -> String {
        format!("`{kind}`")
    }
}
