//! Tokenizer for transcript text.
//!
//! Spoken transcripts are free text, so the tokenizer never fails: words,
//! numbers and punctuation that matters for sentence structure become
//! [`Token`]s, and any other character is skipped.
//!
//! The public entry point is [`tokenize`]. [`sentences`] splits a token
//! stream at sentence terminators and [`lowercase_words`] yields the
//! normalized word sequence used by scoring.

use winnow::{
    Parser as _,
    ascii::{digit1, multispace0},
    combinator::{alt, not, opt},
    error::ModalResult,
    stream::{LocatingSlice, Stream},
    token::{one_of, take_while},
};

use crate::span::Span;

type Input<'a> = LocatingSlice<&'a str>;

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Letters and digits, with inner apostrophes and hyphens (`trade-off`, `CEO's`).
    Word,
    /// Digits with an optional decimal or thousands part (`1990`, `3.5`).
    Number,
    /// One of `. ! ? ; : ,`.
    Punct(char),
}

/// A token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    span: Span,
}

impl<'a> Token<'a> {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The token's text exactly as it appears in the source.
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Word)
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, TokenKind::Number)
    }

    /// Returns true for tokens that end a sentence.
    pub fn is_sentence_end(&self) -> bool {
        matches!(self.kind, TokenKind::Punct('.' | '!' | '?' | ';'))
    }

    /// Returns true for a comma.
    pub fn is_comma(&self) -> bool {
        matches!(self.kind, TokenKind::Punct(','))
    }

    /// Returns true if the token starts with an uppercase letter.
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// The lowercased token text with a trailing possessive removed.
    pub fn lower(&self) -> String {
        let lower = self.text.to_lowercase();
        match lower
            .strip_suffix("'s")
            .or_else(|| lower.strip_suffix("’s"))
        {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => lower,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '\'' | '’' | '-')
}

fn number<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    (
        digit1,
        opt((one_of(['.', ',']), digit1)),
        not(one_of(is_word_char)),
    )
        .take()
        .with_span()
        .map(|(text, range)| Token {
            kind: TokenKind::Number,
            text,
            span: Span::new(range),
        })
        .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    (
        one_of(|c: char| c.is_alphanumeric()),
        take_while(0.., is_word_char),
    )
        .take()
        .with_span()
        .map(|(text, range): (&'a str, std::ops::Range<usize>)| {
            // Trailing apostrophes and hyphens belong to the surrounding prose
            let trimmed = text.trim_end_matches(['\'', '’', '-']);
            let start = range.start;
            let kind = if trimmed.chars().all(|c| c.is_ascii_digit()) {
                TokenKind::Number
            } else {
                TokenKind::Word
            };
            Token {
                kind,
                text: trimmed,
                span: Span::new(start..start + trimmed.len()),
            }
        })
        .parse_next(input)
}

fn punct<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    one_of(['.', '!', '?', ';', ':', ','])
        .with_taken()
        .with_span()
        .map(|((c, text), range)| Token {
            kind: TokenKind::Punct(c),
            text,
            span: Span::new(range),
        })
        .parse_next(input)
}

fn token<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    alt((number, word, punct)).parse_next(input)
}

fn whitespace(input: &mut Input<'_>) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

/// Tokenize transcript text.
///
/// Characters that start no token (quotes, symbols, emoji) are skipped one
/// at a time.
///
/// # Examples
///
/// ```
/// # use scenecast_text::lexer::{tokenize, TokenKind};
/// let tokens = tokenize("In 1990, the CEO's team grew.");
/// let texts: Vec<_> = tokens.iter().filter(|t| !matches!(t.kind(), TokenKind::Punct(_))).map(|t| t.text()).collect();
/// assert_eq!(texts, ["In", "1990", "the", "CEO's", "team", "grew"]);
/// ```
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut input = LocatingSlice::new(text);
    let mut tokens = Vec::new();

    loop {
        if whitespace(&mut input).is_err() || input.is_empty() {
            break;
        }
        match token(&mut input) {
            Ok(token) => tokens.push(token),
            Err(_) => {
                input.next_token();
            }
        }
    }

    tokens
}

/// Split a token stream into sentences.
///
/// Terminators are dropped and empty sentences are skipped.
pub fn sentences<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    tokens
        .split(|token| token.is_sentence_end())
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// The lowercased word and number tokens of `text`, in order.
pub fn lowercase_words(text: &str) -> Vec<String> {
    tokenize(text)
        .iter()
        .filter(|token| token.is_word() || token.is_number())
        .map(|token| token.lower())
        .collect()
}
