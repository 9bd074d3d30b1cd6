use logos::Logos;

/// Span in the path string (byte offsets, half-open)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} is past its end {}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Move the span right by `offset` bytes, e.g. into the coordinates of
    /// the document that contains the path literal.
    pub fn shift(self, offset: usize) -> Span {
        Span::new(self.start + offset, self.end + offset)
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{}", s),
            Token::Dot => write!(f, "."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Eof => write!(f, "end of path"),
        }
    }
}

/// Character that stopped the token stream early
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {}..{}", span.start, span.end)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Result of tokenizing a whole path
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    /// Always ends with exactly one `Token::Eof`
    pub tokens: Vec<SpannedToken>,
    /// Set when an unrecognized character cut the stream short
    pub error: Option<LexError>,
}

/// Lexer wrapper that produces SpannedTokens.
///
/// Iterating yields every recognized token and stops for good at the end of
/// input or at the first unrecognized character. It never yields `Eof`.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Token>,
    finished: bool,
    error: Option<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: Token::lexer(source),
            finished: false,
            error: None,
        }
    }

    /// Tokenize the entire path into a Vec terminated by `Eof`
    pub fn tokenize(source: &str) -> Lexed {
        let mut lexer = Lexer::new(source);
        let mut tokens: Vec<SpannedToken> = lexer.by_ref().collect();

        let error = lexer.error.take();
        let eof_at = error.as_ref().map(|e| e.span.start).unwrap_or(source.len());
        tokens.push(SpannedToken {
            token: Token::Eof,
            span: Span::new(eof_at, eof_at),
        });

        Lexed { tokens, error }
    }

    /// The error that ended lexing, if any
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }
}

impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<SpannedToken> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(token)) => {
                let span = self.inner.span();
                Some(SpannedToken {
                    token,
                    span: Span::new(span.start, span.end),
                })
            }
            Some(Err(())) => {
                self.finished = true;
                // logos may report a partial byte range for multi-byte input
                let start = self.inner.span().start;
                let ch = self.inner.source()[start..].chars().next().unwrap_or('\u{fffd}');
                tracing::trace!(at = start, "lens path lexing stopped at unexpected character");
                self.error = Some(LexError {
                    message: format!("unexpected character: '{}'", ch),
                    span: Span::new(start, start + ch.len_utf8()),
                });
                None
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
