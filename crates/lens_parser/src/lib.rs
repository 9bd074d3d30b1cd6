use lens_ast::*;
use lens_lexer::{LexError, Lexer, Span, SpannedToken, Token};


#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {}..{}", span.start, span.end)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError { message: e.message, span: e.span }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Outcome of parsing a path string
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    /// Longest valid prefix of the input
    pub path: Path,
    /// Why parsing stopped before the end of input, if it did
    pub error: Option<ParseError>,
}

impl ParsedPath {
    /// True when the whole input matched the grammar
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse `source`, keeping the longest valid prefix
pub fn parse(source: &str) -> Path {
    Parser::parse(source).path
}

/// Same as [`parse`]; named for call sites that rely on the recovery
pub fn longest_valid_prefix(source: &str) -> Path {
    parse(source)
}

pub struct Parser<'src> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    lex_error: Option<LexError>,
    source: &'src str,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let lexed = Lexer::tokenize(source);
        Self {
            tokens: lexed.tokens,
            pos: 0,
            lex_error: lexed.error,
            source,
        }
    }

    /// Callers are expected to reject blank input before parsing
    pub fn parse(source: &str) -> ParsedPath {
        let mut parser = Parser::new(source);
        parser.parse_path()
    }

    // === Token Access ===

    fn current(&self) -> &SpannedToken {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn peek_span(&self) -> Span {
        self.current().span
    }

    fn advance(&mut self) -> &SpannedToken {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    /// Error for the current token. At `Eof` caused by a bad character the
    /// lexer's complaint is more useful than "found end of path".
    fn unexpected(&self, expected: &str) -> ParseError {
        if matches!(self.peek(), Token::Eof) {
            if let Some(e) = &self.lex_error {
                return e.clone().into();
            }
        }
        ParseError {
            message: format!("expected {}, found '{}'", expected, self.peek()),
            span: self.peek_span(),
        }
    }

    fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken> {
        if self.check(&expected) {
            Ok(self.advance().clone())
        } else {
            Err(self.unexpected(&format!("'{}'", expected)))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        match self.peek().clone() {
            Token::Ident(name) => {
                let span = self.peek_span();
                self.advance();
                Ok(Ident::new(name, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // === Parsing ===

    // path := segment (DOT segment)*
    // segment := IDENT (LPAREN RPAREN)?
    fn parse_path(&mut self) -> ParsedPath {
        let mut segments = Vec::new();
        let mut separators = Vec::new();
        // A dot only belongs to the path once the segment after it is complete
        let mut pending_dot: Option<Span> = None;

        let error = loop {
            match self.parse_segment() {
                Ok(segment) => {
                    if let Some(span) = pending_dot.take() {
                        separators.push(Separator { span });
                    }
                    segments.push(segment);
                }
                Err(e) => break Some(e),
            }

            match self.peek() {
                Token::Eof => break self.lex_error.clone().map(ParseError::from),
                Token::Dot => pending_dot = Some(self.advance().span),
                _ => break Some(self.unexpected("'.' or end of path")),
            }
        };

        if let Some(e) = &error {
            tracing::debug!(
                path = self.source,
                kept = segments.len(),
                at = e.span.start,
                "lens path recovered to its longest valid prefix: {}",
                e.message
            );
        }

        // every separator was pushed together with the segment after it
        let path = Path::new(segments, separators).unwrap_or_default();
        ParsedPath { path, error }
    }

    fn parse_segment(&mut self) -> ParseResult<PathSegment> {
        let name = self.expect_ident()?;

        if !self.check(&Token::LParen) {
            let span = name.span;
            return Ok(PathSegment::Property(Property { name, span }));
        }

        self.advance();
        let close = self.expect(Token::RParen)?;
        let span = name.span.to(close.span);
        Ok(PathSegment::Method(Method { name, span }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(path: &Path) -> Vec<String> {
        path.iter()
            .map(|s| match s {
                PathSegment::Property(p) => format!("Property({})", p.name.name),
                PathSegment::Method(m) => format!("Method({})", m.name.name),
            })
            .collect()
    }

    #[test]
    fn test_parse_single_identifier() {
        let parsed = Parser::parse("name");
        assert!(parsed.is_complete());
        assert_eq!(shape(&parsed.path), vec!["Property(name)"]);
        assert!(parsed.path.separators().is_empty());
    }

    #[test]
    fn test_parse_properties() {
        let path = parse("a.b.c");
        assert_eq!(shape(&path), vec!["Property(a)", "Property(b)", "Property(c)"]);

        let spans: Vec<_> = path.iter().map(|s| s.span()).collect();
        assert_eq!(spans, vec![Span::new(0, 1), Span::new(2, 3), Span::new(4, 5)]);
        assert!(spans.windows(2).all(|w| w[0].end < w[1].start));
    }

    #[test]
    fn test_parse_method_in_the_middle() {
        let path = parse("a.m().b");
        assert_eq!(shape(&path), vec!["Property(a)", "Method(m)", "Property(b)"]);

        let method = &path.segments()[1];
        assert_eq!(method.span(), Span::new(2, 5));
        assert_eq!(method.name_span(), Span::new(2, 3));
        assert_eq!(path.separators()[1].span, Span::new(5, 6));
    }

    #[test]
    fn test_trailing_dot_is_dropped() {
        let parsed = Parser::parse("a.b.");
        assert_eq!(parsed.path, parse("a.b"));
        let error = parsed.error.unwrap();
        assert_eq!(error.span, Span::new(4, 4));
        assert!(error.message.contains("expected identifier"));
    }

    #[test]
    fn test_consecutive_dots_stop_at_first_segment() {
        let parsed = Parser::parse("a..b");
        assert_eq!(shape(&parsed.path), vec!["Property(a)"]);
        assert!(parsed.path.separators().is_empty());
        assert_eq!(parsed.error.unwrap().span, Span::new(2, 3));
    }

    #[test]
    fn test_unclosed_call_is_excluded() {
        assert_eq!(shape(&parse("a.m(")), vec!["Property(a)"]);
        assert_eq!(shape(&parse("a.m(b")), vec!["Property(a)"]);
        assert_eq!(shape(&parse("m(")), Vec::<String>::new());
    }

    #[test]
    fn test_token_after_segment_stops_parsing() {
        let parsed = Parser::parse("a()b.c");
        assert_eq!(shape(&parsed.path), vec!["Method(a)"]);
        assert!(parsed.error.unwrap().message.contains("'.' or end of path"));

        assert_eq!(shape(&parse("a)")), vec!["Property(a)"]);
    }

    #[test]
    fn test_unexpected_character_reports_lexer_error() {
        let parsed = Parser::parse("a.b$c");
        assert_eq!(shape(&parsed.path), vec!["Property(a)", "Property(b)"]);
        let error = parsed.error.unwrap();
        assert_eq!(error.span, Span::new(3, 4));
        assert!(error.message.contains("unexpected character"));

        let parsed = Parser::parse("a.$");
        assert_eq!(shape(&parsed.path), vec!["Property(a)"]);
        assert!(parsed.error.unwrap().message.contains("'$'"));
    }

    #[test]
    fn test_no_valid_leading_segment() {
        for source in [".a", "(", ")", "1abc", " a"] {
            let parsed = Parser::parse(source);
            assert!(parsed.path.is_empty(), "{source:?} should not produce segments");
            assert!(parsed.error.is_some());
        }
    }

    #[test]
    fn test_longest_valid_prefix_matches_parse() {
        assert_eq!(longest_valid_prefix("orders.get(.x"), parse("orders"));
    }
}
