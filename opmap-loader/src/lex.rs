use core::{iter, str::CharIndices};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'a> {
    /// Byte offset of the start of the token.
    pub pos: usize,
    pub kind: TokenKind<'a>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind<'a> {
    /// An unquoted field, untrimmed. May be empty.
    Field(&'a str),
    /// The contents of a quoted field, without the quotes.
    Quoted(&'a str),
    Comma,
    Newline,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LexError {
    pub pos: usize,
    pub kind: LexErrorKind,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LexErrorKind {
    UnterminatedQuote,
    /// `""` inside a quoted field. Fields are borrowed from the input, so there's nowhere to
    /// put the unescaped text.
    EscapedQuote,
    /// A quote in the middle of an unquoted field, or text after a closing quote.
    UnexpectedQuote,
}

struct Cursor<'a> {
    input: &'a str,
    chars: iter::Peekable<CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn next(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn offset(&mut self) -> usize {
        self.peek().map_or(self.input.len(), |(i, _)| i)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }
}

macro_rules! take_while {
    ($c:expr, $x:expr) => {{
        let start = $c.offset();
        while let Some((_, c)) = $c.peek() {
            if !$x(c) {
                break;
            }
            $c.next();
        }
        let end = $c.offset();
        $c.slice(start, end)
    }};
}

/// Splits CSV text into fields and separators. An empty field is produced wherever a field is
/// expected but absent, so `a,,b` lexes as `a`, `,`, ``, `,`, `b`.
pub fn lex(input: &str) -> impl Iterator<Item = Result<Token<'_>, LexError>> {
    let mut cur = Cursor {
        input,
        chars: input.char_indices().peekable(),
    };
    // whether the next token is a field, true at the start of every record
    let mut want_field = true;
    let mut done = false;
    iter::from_fn(move || {
        if done {
            return None;
        }
        if want_field {
            want_field = false;
            take_while!(cur, is_blank);
            let pos = cur.offset();
            let kind = if let Some((_, '"')) = cur.peek() {
                cur.next();
                let body = take_while!(cur, |c| c != '"');
                if cur.next().is_none() {
                    done = true;
                    return Some(Err(LexError {
                        pos,
                        kind: LexErrorKind::UnterminatedQuote,
                    }));
                }
                take_while!(cur, is_blank);
                match cur.peek() {
                    Some((i, '"')) => {
                        done = true;
                        return Some(Err(LexError {
                            pos: i,
                            kind: LexErrorKind::EscapedQuote,
                        }));
                    }
                    Some((i, c)) if !is_separator(c) => {
                        done = true;
                        return Some(Err(LexError {
                            pos: i,
                            kind: LexErrorKind::UnexpectedQuote,
                        }));
                    }
                    Some(_) | None => TokenKind::Quoted(body),
                }
            } else {
                let body = take_while!(cur, |c| !is_separator(c) && c != '"');
                if let Some((i, '"')) = cur.peek() {
                    done = true;
                    return Some(Err(LexError {
                        pos: i,
                        kind: LexErrorKind::UnexpectedQuote,
                    }));
                }
                TokenKind::Field(body)
            };
            return Some(Ok(Token { pos, kind }));
        }

        match cur.next() {
            Some((i, ',')) => {
                want_field = true;
                Some(Ok(Token {
                    pos: i,
                    kind: TokenKind::Comma,
                }))
            }
            Some((i, '\n')) => {
                want_field = true;
                Some(Ok(Token {
                    pos: i,
                    kind: TokenKind::Newline,
                }))
            }
            Some((i, '\r')) => {
                if let Some((_, '\n')) = cur.peek() {
                    cur.next();
                }
                want_field = true;
                Some(Ok(Token {
                    pos: i,
                    kind: TokenKind::Newline,
                }))
            }
            // fields only stop at separators or the end of input
            Some(_) | None => {
                done = true;
                None
            }
        }
    })
}

#[inline(always)]
fn is_separator(c: char) -> bool {
    matches!(c, ',' | '\n' | '\r')
}

#[inline(always)]
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}
