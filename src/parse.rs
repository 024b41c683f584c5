//! Template lexer.
//!
//! A template is literal text with embedded pattern words of the form
//! `${name}`. A literal dollar sign is written `$$`; all other characters
//! stand for themselves. The lexer produces the alternating sequence of
//! literal and pattern-word segments, reporting grammar errors with the
//! byte offset where the offending construct begins.

use crate::error::ParseError;

/// A segment of a template string - either literal text or a pattern word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Characters permitted inside a pattern word.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '/' | ':' | '=' | '#')
}

/// Lexes `template` into segments. Literal and pattern-word segments
/// alternate; an empty literal is emitted before a pattern word that starts
/// the template or directly follows another pattern word, and no trailing
/// empty literal is emitted.
pub fn parse(template: &str) -> Result<Vec<Segment>, ParseError> {
    enum State {
        Free,   // in literal text
        Dollar, // saw a $, looking for $ or {
        Word,   // inside a pattern word
    }

    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut start = 0; // offset of the $ opening the current construct
    let mut state = State::Free;

    for (i, c) in template.char_indices() {
        match state {
            State::Free => {
                if c == '$' {
                    start = i;
                    state = State::Dollar;
                } else {
                    buf.push(c);
                }
            }
            State::Dollar => match c {
                '$' => {
                    buf.push('$');
                    state = State::Free;
                }
                '{' => {
                    segments.push(Segment::Literal(std::mem::take(&mut buf)));
                    state = State::Word;
                }
                _ => {
                    return Err(ParseError::new(i, format!("wanted $ or {{ but found '{c}'")));
                }
            },
            State::Word => match c {
                '}' => {
                    if buf.is_empty() {
                        return Err(ParseError::new(start, "empty pattern word"));
                    }
                    segments.push(Segment::Placeholder(std::mem::take(&mut buf)));
                    state = State::Free;
                }
                c if is_word_char(c) => buf.push(c),
                _ => {
                    return Err(ParseError::new(i, format!("invalid name letter '{c}'")));
                }
            },
        }
    }

    match state {
        State::Dollar => Err(ParseError::new(start, "incomplete $ escape")),
        State::Word => Err(ParseError::new(start, "incomplete pattern word")),
        State::Free => {
            if !buf.is_empty() {
                segments.push(Segment::Literal(buf));
            }
            Ok(segments)
        }
    }
}
