use crate::error::{Result, RqlError};

/// Syntactic role of a token, fixed at scan time.
///
/// The role is mostly recoverable from the token text, but not always: an
/// escaped paren (`\(`) is plain data and must not be mistaken for a
/// structural `(`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `name(`: start of a function call's argument list
    FunctionOpen,

    /// A bare `(` with no function name in front of it
    Open,

    /// `)`
    Close,

    /// A literal wrapped in matching quotes, quotes kept
    ///
    /// # Examples
    /// ```text
    /// 'LAYS'
    /// "a,b,c"
    /// ```
    Quoted,

    /// Identifier, operator symbol, or unquoted value
    Bare,
}

/// A token extracted from RQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text as emitted. Function opens keep their trailing `(`.
    pub text: String,
    pub kind: TokenKind,
    /// Character offset of the first character of the token.
    pub position: usize,
    /// Char indices into `text` of characters written behind a backslash.
    pub escaped: Vec<usize>,
}

impl Token {
    fn new(text: String, kind: TokenKind, position: usize) -> Self {
        Token {
            text,
            kind,
            position,
            escaped: Vec::new(),
        }
    }

    fn scanned(state: ScanState, kind: TokenKind) -> Self {
        Token {
            text: state.text,
            kind,
            position: state.start,
            escaped: state.escaped,
        }
    }

    /// True when the char at `index` of `text` came from an escape sequence.
    pub fn is_escaped(&self, index: usize) -> bool {
        self.escaped.binary_search(&index).is_ok()
    }

    /// Offset in the source text of the char at `index` of `text`.
    pub fn source_offset(&self, index: usize) -> usize {
        self.position + index + self.escaped.partition_point(|&e| e <= index)
    }

    /// Name of the function for a function-open token.
    pub fn function_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::FunctionOpen => self.text.strip_suffix('('),
            _ => None,
        }
    }
}

/// Single-pass RQL scanner.
///
/// One tokenizer processes one string. Tokens are produced lazily through
/// [`Iterator`]; the sequence cannot be restarted and ends after the first
/// error.
///
/// ```
/// use rql_engine::Tokenizer;
///
/// let tokens = Tokenizer::new("eq(brandfamily,'LAYS')").as_list().unwrap();
/// assert_eq!(tokens, vec!["eq(", "brandfamily", "'LAYS'", ")"]);
/// ```
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    /// Open nesting levels: function name (empty for a bare paren) and offset
    opens: Vec<(String, usize)>,
    finished: bool,
}

/// Per-token scan state. Quoting and escaping never span a token boundary.
#[derive(Default)]
struct ScanState {
    text: String,
    start: usize,
    /// Offset of a backslash waiting for its escaped character
    escape: Option<usize>,
    escaped: Vec<usize>,
    /// Active quote character and the offset it was opened at
    quote: Option<(char, usize)>,
    leading_quote: bool,
    /// Length in chars of the token when its first quoted section closed
    first_close: Option<usize>,
}

impl ScanState {
    fn begin(&mut self, position: usize) {
        if self.text.is_empty() {
            self.start = position;
        }
    }

    fn kind(&self) -> TokenKind {
        if self.leading_quote && self.first_close == Some(self.text.chars().count()) {
            TokenKind::Quoted
        } else {
            TokenKind::Bare
        }
    }
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Tokenizer {
            input: input.chars().collect(),
            position: 0,
            opens: Vec::new(),
            finished: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Drain every token into a list of token strings.
    pub fn as_list(self) -> Result<Vec<String>> {
        self.map(|token| token.map(|t| t.text)).collect()
    }

    /// Scan the next token, or `None` at a well-formed end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let mut state = ScanState::default();

        while let Some(ch) = self.current_char() {
            if state.escape.is_some() {
                state.escaped.push(state.text.chars().count());
                state.text.push(ch);
                state.escape = None;
                self.advance();
                continue;
            }

            if let Some((quote, _)) = state.quote {
                match ch {
                    '\\' => state.escape = Some(self.position),
                    c if c == quote => {
                        state.text.push(c);
                        state.quote = None;
                        if state.first_close.is_none() {
                            state.first_close = Some(state.text.chars().count());
                        }
                    }
                    c => state.text.push(c),
                }
                self.advance();
                continue;
            }

            match ch {
                '\\' => {
                    state.begin(self.position);
                    state.escape = Some(self.position);
                    self.advance();
                }
                '\'' | '"' => {
                    if state.text.is_empty() {
                        state.start = self.position;
                        state.leading_quote = true;
                    }
                    state.quote = Some((ch, self.position));
                    state.text.push(ch);
                    self.advance();
                }
                c if c == ',' || c.is_whitespace() => {
                    self.advance();
                    if !state.text.is_empty() {
                        let kind = state.kind();
                        return Ok(Some(Token::scanned(state, kind)));
                    }
                }
                '(' => {
                    let position = self.position;
                    self.advance();
                    if state.text.is_empty() {
                        self.opens.push((String::new(), position));
                        return Ok(Some(Token::new("(".to_string(), TokenKind::Open, position)));
                    }
                    self.opens.push((state.text.clone(), state.start));
                    state.text.push('(');
                    return Ok(Some(Token::scanned(state, TokenKind::FunctionOpen)));
                }
                ')' => {
                    // Flush the pending token first; the paren is seen again on the next call
                    if !state.text.is_empty() {
                        let kind = state.kind();
                        return Ok(Some(Token::scanned(state, kind)));
                    }
                    let position = self.position;
                    if self.opens.pop().is_none() {
                        return Err(RqlError::UnmatchedClose { position });
                    }
                    self.advance();
                    return Ok(Some(Token::new(")".to_string(), TokenKind::Close, position)));
                }
                c => {
                    state.begin(self.position);
                    state.text.push(c);
                    self.advance();
                }
            }
        }

        if let Some(position) = state.escape {
            return Err(RqlError::TrailingEscape { position });
        }
        if let Some((quote, position)) = state.quote {
            return Err(RqlError::UnterminatedQuote { quote, position });
        }
        if !state.text.is_empty() {
            let kind = state.kind();
            return Ok(Some(Token::scanned(state, kind)));
        }
        if let Some((name, position)) = self.opens.pop() {
            return Err(RqlError::UnclosedFunction { name, position });
        }
        Ok(None)
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokenizer {}

/// Tokenize `input` into token strings.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    Tokenizer::new(input).as_list()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let tokens: Vec<Token> = Tokenizer::new("f('a', b, \\()")
            .collect::<Result<_>>()
            .unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::FunctionOpen,
                TokenKind::Quoted,
                TokenKind::Bare,
                TokenKind::Bare,
                TokenKind::Close
            ]
        );
        assert_eq!(tokens[0].function_name(), Some("f"));
        assert_eq!(tokens[3].text, "(");
    }

    #[test]
    fn test_positions() {
        let tokens: Vec<Token> = Tokenizer::new("eq(a, 'b')").collect::<Result<_>>().unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_escaped_chars_are_recorded() {
        let tokens: Vec<Token> = Tokenizer::new(r"a\=b 'q\'r' c=d").collect::<Result<_>>().unwrap();
        assert_eq!(tokens[0].text, "a=b");
        assert_eq!(tokens[0].escaped, vec![1]);
        assert!(tokens[0].is_escaped(1));
        assert_eq!(tokens[0].source_offset(2), 3);
        assert_eq!(tokens[1].text, "'q'r'");
        assert_eq!(tokens[1].escaped, vec![2]);
        assert!(tokens[2].escaped.is_empty());
    }

    #[test]
    fn test_fused_after_error() {
        let mut tokenizer = Tokenizer::new("a)b");
        assert_eq!(tokenizer.next().unwrap().unwrap().text, "a");
        assert!(tokenizer.next().unwrap().is_err());
        assert!(tokenizer.next().is_none());
    }
}
