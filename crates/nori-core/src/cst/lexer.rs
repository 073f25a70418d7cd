//! Trivia-preserving lexer for CS source
//!
//! Preserves ALL source information (whitespace, comments, newlines,
//! preprocessor directives) so the CST can round-trip losslessly:
//! `parse(source).text() == source`.

use std::ops::Range;

use super::CsSyntaxKind;

/// Span of a token in the source, in bytes.
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: CsSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: CsSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving all trivia for CST construction.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        match current {
            '\n' => {
                tokens.push(token(CsSyntaxKind::Newline, input, start, i + size));
                i += size;
            }
            '\r' => {
                // \r\n is a single newline token
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                tokens.push(token(CsSyntaxKind::Newline, input, start, end));
                i = end;
            }
            c if c.is_whitespace() => {
                let mut end = i + size;
                while let Some((c, s)) = next_char(input, end) {
                    if c.is_whitespace() && c != '\n' && c != '\r' {
                        end += s;
                    } else {
                        break;
                    }
                }
                tokens.push(token(CsSyntaxKind::Whitespace, input, start, end));
                i = end;
            }
            '/' => {
                let next = next_char(input, i + size).map(|(c, _)| c);
                match next {
                    Some('/') => {
                        let end = line_end(input, start);
                        tokens.push(token(CsSyntaxKind::CommentLine, input, start, end));
                        i = end;
                    }
                    Some('*') => {
                        let (end, terminated) = block_comment_end(input, start);
                        if !terminated {
                            errors.push(LexerError::new("unterminated block comment", start..end));
                        }
                        tokens.push(token(CsSyntaxKind::CommentBlock, input, start, end));
                        i = end;
                    }
                    _ => {
                        tokens.push(token(CsSyntaxKind::Slash, input, start, i + size));
                        i += size;
                    }
                }
            }
            '#' => {
                // Preprocessor directive: runs to end of line
                let end = line_end(input, start);
                tokens.push(token(CsSyntaxKind::Directive, input, start, end));
                i = end;
            }
            '"' => {
                let (end, terminated) = string_end(input, start);
                if !terminated {
                    errors.push(LexerError::new("unterminated string literal", start..end));
                }
                tokens.push(token(CsSyntaxKind::StringLiteral, input, start, end));
                i = end;
            }
            '\'' => {
                let (end, terminated) = char_literal_end(input, start);
                if !terminated {
                    errors.push(LexerError::new("unterminated character literal", start..end));
                }
                tokens.push(token(CsSyntaxKind::CharLiteral, input, start, end));
                i = end;
            }
            c if c.is_ascii_digit() => {
                let mut end = i + size;
                while let Some((c, s)) = next_char(input, end) {
                    if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
                        end += s;
                    } else {
                        break;
                    }
                }
                tokens.push(token(CsSyntaxKind::IntLiteral, input, start, end));
                i = end;
            }
            c if c.is_alphabetic() || c == '_' || c == '@' => {
                let mut end = i + size;
                while let Some((c, s)) = next_char(input, end) {
                    if c.is_alphanumeric() || c == '_' {
                        end += s;
                    } else {
                        break;
                    }
                }
                let text = &input[start..end];
                let kind = CsSyntaxKind::from_keyword(text).unwrap_or(CsSyntaxKind::Ident);
                tokens.push(token(kind, input, start, end));
                i = end;
            }
            _ => {
                let (kind, end) = punctuation(input, start, current, size);
                if kind == CsSyntaxKind::Error {
                    errors.push(LexerError::new(
                        format!("unexpected character '{current}'"),
                        start..end,
                    ));
                }
                tokens.push(token(kind, input, start, end));
                i = end;
            }
        }
    }

    tokens.push(CstToken::new(CsSyntaxKind::Eof, "", len..len));
    (tokens, errors)
}

fn token(kind: CsSyntaxKind, input: &str, start: usize, end: usize) -> CstToken {
    CstToken::new(kind, &input[start..end], start..end)
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn line_end(input: &str, start: usize) -> usize {
    input[start..]
        .find(['\n', '\r'])
        .map(|off| start + off)
        .unwrap_or(input.len())
}

fn block_comment_end(input: &str, start: usize) -> (usize, bool) {
    // Skip the opening /*
    match input[start + 2..].find("*/") {
        Some(off) => (start + 2 + off + 2, true),
        None => (input.len(), false),
    }
}

fn string_end(input: &str, start: usize) -> (usize, bool) {
    let mut i = start + 1;
    while let Some((c, size)) = next_char(input, i) {
        match c {
            '\\' => {
                i += size;
                if let Some((_, esc)) = next_char(input, i) {
                    i += esc;
                }
            }
            '"' => return (i + size, true),
            '\n' | '\r' => return (i, false),
            _ => i += size,
        }
    }
    (input.len(), false)
}

fn char_literal_end(input: &str, start: usize) -> (usize, bool) {
    let mut i = start + 1;
    while let Some((c, size)) = next_char(input, i) {
        match c {
            '\\' => {
                i += size;
                if let Some((_, esc)) = next_char(input, i) {
                    i += esc;
                }
            }
            '\'' => return (i + size, true),
            '\n' | '\r' => return (i, false),
            _ => i += size,
        }
    }
    (input.len(), false)
}

fn punctuation(input: &str, start: usize, current: char, size: usize) -> (CsSyntaxKind, usize) {
    let next = next_char(input, start + size).map(|(c, _)| c);
    let two = |kind| (kind, start + size + 1);
    let one = |kind| (kind, start + size);

    match (current, next) {
        ('=', Some('>')) => two(CsSyntaxKind::Arrow),
        ('=', Some('=')) => two(CsSyntaxKind::EqEq),
        ('!', Some('=')) => two(CsSyntaxKind::Neq),
        ('<', Some('=')) => two(CsSyntaxKind::LtEq),
        ('>', Some('=')) => two(CsSyntaxKind::GtEq),
        ('&', Some('&')) => two(CsSyntaxKind::AmpAmp),
        ('|', Some('|')) => two(CsSyntaxKind::PipePipe),
        ('{', _) => one(CsSyntaxKind::LBrace),
        ('}', _) => one(CsSyntaxKind::RBrace),
        ('(', _) => one(CsSyntaxKind::LParen),
        (')', _) => one(CsSyntaxKind::RParen),
        ('[', _) => one(CsSyntaxKind::LBracket),
        (']', _) => one(CsSyntaxKind::RBracket),
        (';', _) => one(CsSyntaxKind::Semicolon),
        (',', _) => one(CsSyntaxKind::Comma),
        ('.', _) => one(CsSyntaxKind::Dot),
        (':', _) => one(CsSyntaxKind::Colon),
        ('=', _) => one(CsSyntaxKind::Eq),
        ('<', _) => one(CsSyntaxKind::Lt),
        ('>', _) => one(CsSyntaxKind::Gt),
        ('!', _) => one(CsSyntaxKind::Bang),
        ('+', _) => one(CsSyntaxKind::Plus),
        ('-', _) => one(CsSyntaxKind::Minus),
        ('*', _) => one(CsSyntaxKind::Star),
        ('%', _) => one(CsSyntaxKind::Percent),
        ('?', _) => one(CsSyntaxKind::Question),
        _ => one(CsSyntaxKind::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<CsSyntaxKind> {
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty(), "unexpected lexer errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_method_header() {
        let kinds = kinds("int MyMethod()");
        assert_eq!(
            kinds,
            vec![
                CsSyntaxKind::Ident,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Ident,
                CsSyntaxKind::LParen,
                CsSyntaxKind::RParen,
                CsSyntaxKind::Eof,
            ]
        );
    }

    #[test]
    fn roundtrip_preserves_text() {
        let source = "int MyMethod()\n{\n    return 5; // five\n}\n";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty());
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn keywords_and_arrow() {
        let kinds = kinds("void M() => x;");
        assert!(kinds.contains(&CsSyntaxKind::VoidKw));
        assert!(kinds.contains(&CsSyntaxKind::Arrow));
    }

    #[test]
    fn comments_and_directives() {
        let (tokens, _) = lex_with_trivia("#region test\n// line\n/* block */");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&CsSyntaxKind::Directive));
        assert!(kinds.contains(&CsSyntaxKind::CommentLine));
        assert!(kinds.contains(&CsSyntaxKind::CommentBlock));
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (_, errors) = lex_with_trivia("\"not closed");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unterminated string"));
    }

    #[test]
    fn crlf_is_one_newline() {
        let (tokens, _) = lex_with_trivia("a\r\nb");
        let newlines: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CsSyntaxKind::Newline)
            .collect();
        assert_eq!(newlines.len(), 1);
        assert_eq!(newlines[0].text, "\r\n");
    }
}
