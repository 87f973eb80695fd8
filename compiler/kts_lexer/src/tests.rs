use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).tokens.iter().map(|t| t.kind).collect()
}

fn texts(source: &str) -> Vec<String> {
    let lexed = lex(source);
    (0..lexed.tokens.len())
        .map(|i| lexed.tokens.text(i).to_owned())
        .collect()
}

#[test]
fn test_lex_annotation() {
    assert_eq!(
        kinds("@Suppress(\"unused_variable\")"),
        vec![
            TokenKind::At,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::StringLiteral,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_and_soft_keywords() {
    assert_eq!(
        kinds("this in is file get suspend inside"),
        vec![
            TokenKind::This,
            TokenKind::In,
            TokenKind::Is,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_merged_operators() {
    assert_eq!(
        kinds("a !in b !is C as? D"),
        vec![
            TokenKind::Identifier,
            TokenKind::NotIn,
            TokenKind::Identifier,
            TokenKind::NotIs,
            TokenKind::Identifier,
            TokenKind::AsSafe,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    // Separated parts stay separate.
    assert_eq!(
        kinds("! in"),
        vec![TokenKind::Excl, TokenKind::In, TokenKind::Eof]
    );
    assert_eq!(
        kinds("!inside"),
        vec![TokenKind::Excl, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("a?.b ?: c::class 1..2 1..<3 x->y"),
        vec![
            TokenKind::Identifier,
            TokenKind::SafeAccess,
            TokenKind::Identifier,
            TokenKind::Elvis,
            TokenKind::Identifier,
            TokenKind::ColonColon,
            TokenKind::Class,
            TokenKind::IntegerLiteral,
            TokenKind::Range,
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::RangeUntil,
            TokenKind::IntegerLiteral,
            TokenKind::Identifier,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numeric_literals() {
    assert_eq!(
        kinds("42 0xFF 0b1010 10L 7u 1_000 3.14 2.5e10 1f .5"),
        vec![
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::FloatLiteral,
            TokenKind::FloatLiteral,
            TokenKind::FloatLiteral,
            TokenKind::FloatLiteral,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_literals_keep_their_text() {
    assert_eq!(
        texts(r#""rem(other)" "a\"b" "${x("}")} y" """raw " text""" 'c' '\n'"#),
        vec![
            r#""rem(other)""#.to_owned(),
            r#""a\"b""#.to_owned(),
            r#""${x("}")} y""#.to_owned(),
            r#""""raw " text""""#.to_owned(),
            "'c'".to_owned(),
            r"'\n'".to_owned(),
            String::new(),
        ]
    );
}

#[test]
fn test_raw_string_trailing_quotes() {
    let lexed = lex(r#""""a"""" x"#);
    assert_eq!(lexed.tokens[0].kind, TokenKind::RawStringLiteral);
    assert_eq!(lexed.tokens.text(0), r#""""a"""""#);
    assert_eq!(lexed.tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn test_trivia_becomes_flags() {
    let lexed = lex("a /* c */ b\n// line\nc");
    let tokens = &lexed.tokens;
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].flags, TokenFlags::empty());
    assert!(tokens[1].flags.contains(TokenFlags::SPACE_BEFORE));
    assert!(tokens[1].flags.contains(TokenFlags::TRIVIA_BEFORE));
    assert!(!tokens[1].flags.contains(TokenFlags::NEWLINE_BEFORE));
    assert!(tokens[2].flags.contains(TokenFlags::NEWLINE_BEFORE));
    assert!(tokens[2].flags.contains(TokenFlags::TRIVIA_BEFORE));
}

#[test]
fn test_nested_block_comment() {
    assert_eq!(
        kinds("a /* outer /* inner */ still comment */ b"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn test_backticked_identifier() {
    assert_eq!(
        kinds("`my name`.x"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_eof_span_is_end_of_source() {
    let lexed = lex("@Foo   ");
    let eof = lexed.tokens[lexed.tokens.len() - 1];
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, Span::point(7));
    assert!(eof.flags.contains(TokenFlags::SPACE_BEFORE));
}

#[test]
fn test_unterminated_string_is_error_token() {
    let lexed = lex("@Foo(\"abc\n)");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
    assert_eq!(lexed.errors[0].span, Span::new(5, 9));
    assert_eq!(lexed.tokens[3].kind, TokenKind::Error);
    // Lexing resumes after the fault.
    assert_eq!(lexed.tokens[4].kind, TokenKind::RParen);
    assert!(lexed.tokens[4].flags.contains(TokenFlags::NEWLINE_BEFORE));
    assert!(lexed.error_at(5).is_some());
}

#[test]
fn test_unterminated_block_comment() {
    let lexed = lex("a /* never closed");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedComment);
    assert_eq!(
        lexed.errors[0].to_string(),
        "unterminated block comment at 2..17"
    );
}

#[test]
fn test_unexpected_character() {
    let lexed = lex("a | b");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnexpectedCharacter);
    assert_eq!(
        kinds("a | b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Error,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

proptest! {
    /// Token spans are ordered, non-overlapping, and everything between
    /// them is trivia.
    #[test]
    fn spans_are_ordered_and_gaps_are_trivia(source in "[a-z@(){}\\[\\],.:=\" \n0-9]{0,40}") {
        let lexed = lex(&source);
        let mut previous_end = 0u32;
        for token in &lexed.tokens {
            prop_assert!(token.span.start >= previous_end);
            let gap = &source[previous_end as usize..token.span.start as usize];
            prop_assert!(gap.chars().all(char::is_whitespace), "gap {gap:?}");
            previous_end = token.span.end;
        }
        prop_assert_eq!(previous_end as usize, source.len());
    }
}
