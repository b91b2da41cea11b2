use crate::{
    ast::{TermId, TermTree},
    error::{Result, RqlError},
    tokenizer::{Token, TokenKind, Tokenizer},
};

/// Deepest call nesting accepted before parsing fails with
/// [`RqlError::TooDeep`].
pub const MAX_DEPTH: usize = 128;

/// Recursive-descent builder turning a token stream into a [`TermTree`].
///
/// The parser does not recover from errors: any lexical or structural
/// failure is returned and no tree is produced.
pub struct Parser {
    tokenizer: Tokenizer,
    /// Calls currently open
    depth: usize,
}

/// Top-level piece of an operator-style clause such as `price=gt=10`.
#[derive(Debug)]
enum Piece {
    Value { text: String, position: usize },
    Equals { position: usize },
}

impl Parser {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Parser { tokenizer, depth: 0 }
    }

    fn next(&mut self) -> Result<Option<Token>> {
        self.tokenizer.next_token()
    }

    /// Parse plain RQL: every top-level call or leaf becomes a root term.
    pub fn parse(mut self) -> Result<TermTree> {
        let mut tree = TermTree::new();
        while let Some(token) = self.next()? {
            self.parse_term(&mut tree, None, token)?;
        }
        Ok(tree)
    }

    /// Parse a clause that may use operator forms at top level:
    /// `a=b` becomes `eq(a,b)`, `a=op=b` becomes `op(a,b)` and
    /// `a=op=(x,y)` becomes `op(a,x,y)`.
    pub fn parse_clause(mut self) -> Result<TermTree> {
        let mut tree = TermTree::new();
        let mut pending = Vec::new();

        while let Some(token) = self.next()? {
            match token.kind {
                TokenKind::Bare => split_operators(&token, &mut pending),
                TokenKind::Quoted => pending.push(Piece::Value {
                    text: token.text,
                    position: token.position,
                }),
                TokenKind::FunctionOpen if has_operator(&token) => {
                    flush_operators(&mut tree, &mut pending)?;
                    self.parse_operator_call(&mut tree, token)?;
                }
                TokenKind::Open => {
                    // `a=in=(1,2)` written with a space before the paren
                    if matches!(pending.last(), Some(Piece::Equals { .. })) {
                        self.parse_operator_list(&mut tree, &mut pending, token.position)?;
                    } else {
                        flush_operators(&mut tree, &mut pending)?;
                        self.parse_term(&mut tree, None, token)?;
                    }
                }
                _ => {
                    flush_operators(&mut tree, &mut pending)?;
                    self.parse_term(&mut tree, None, token)?;
                }
            }
        }
        flush_operators(&mut tree, &mut pending)?;
        Ok(tree)
    }

    fn parse_term(&mut self, tree: &mut TermTree, parent: Option<TermId>, token: Token) -> Result<TermId> {
        match token.kind {
            TokenKind::FunctionOpen => {
                let mut name = token.text;
                name.pop();
                let id = tree.function(parent, name.clone());
                self.parse_arguments(tree, id, name, token.position)?;
                Ok(id)
            }
            TokenKind::Open => Err(RqlError::AnonymousGroup {
                position: token.position,
            }),
            TokenKind::Close => Err(RqlError::UnmatchedClose {
                position: token.position,
            }),
            TokenKind::Quoted | TokenKind::Bare => Ok(tree.leaf(parent, token.text)),
        }
    }

    /// Consume arguments of an open call up to and including its `)`.
    fn parse_arguments(&mut self, tree: &mut TermTree, id: TermId, name: String, position: usize) -> Result<()> {
        if self.depth == MAX_DEPTH {
            return Err(RqlError::TooDeep {
                limit: MAX_DEPTH,
                position,
            });
        }
        self.depth += 1;
        loop {
            match self.next()? {
                Some(token) if token.kind == TokenKind::Close => {
                    self.depth -= 1;
                    return Ok(());
                }
                Some(token) => {
                    self.parse_term(tree, Some(id), token)?;
                }
                None => return Err(RqlError::UnclosedFunction { name, position }),
            }
        }
    }

    /// `col=op=(` opens `op(col, ...)`.
    fn parse_operator_call(&mut self, tree: &mut TermTree, token: Token) -> Result<()> {
        let mut pieces = Vec::new();
        split_operators(&token, &mut pieces);

        match pieces.as_slice() {
            [
                Piece::Value { text: column, .. },
                Piece::Equals { .. },
                Piece::Value { text: op, .. },
                Piece::Equals { .. },
            ] => {
                let id = tree.function(None, op.clone());
                tree.leaf(Some(id), column.clone());
                let op = op.clone();
                self.parse_arguments(tree, id, op, token.position)
            }
            _ => Err(RqlError::MalformedOperator {
                clause: token.text,
                position: token.position,
            }),
        }
    }

    /// Pending `col = op =` followed by a bare `(` list.
    fn parse_operator_list(&mut self, tree: &mut TermTree, pending: &mut Vec<Piece>, position: usize) -> Result<()> {
        let tail = pending.len().saturating_sub(4);
        let operator: Vec<Piece> = pending.drain(tail..).collect();
        flush_operators(tree, pending)?;

        match operator.as_slice() {
            [
                Piece::Value { text: column, .. },
                Piece::Equals { .. },
                Piece::Value { text: op, .. },
                Piece::Equals { .. },
            ] => {
                let id = tree.function(None, op.clone());
                tree.leaf(Some(id), column.clone());
                self.parse_arguments(tree, id, op.clone(), position)
            }
            _ => Err(RqlError::MalformedOperator {
                clause: render_pieces(&operator),
                position: operator.first().map_or(position, piece_position),
            }),
        }
    }
}

fn piece_position(piece: &Piece) -> usize {
    match piece {
        Piece::Value { position, .. } | Piece::Equals { position } => *position,
    }
}

fn render_pieces(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(|p| match p {
            Piece::Value { text, .. } => text.as_str(),
            Piece::Equals { .. } => "=",
        })
        .collect()
}

/// True when the token holds an `=` that was neither escaped nor quoted.
fn has_operator(token: &Token) -> bool {
    let mut pieces = Vec::new();
    split_operators(token, &mut pieces);
    pieces.iter().any(|p| matches!(p, Piece::Equals { .. }))
}

/// Split bare token text on `=` outside of quotes. Escaped `=` and escaped
/// quote characters are plain data. The `(` of a function open is ignored.
fn split_operators(token: &Token, out: &mut Vec<Piece>) {
    let text = token.function_name().unwrap_or(&token.text);
    let mut quote = None;
    let mut current = String::new();
    let mut start = 0;

    for (i, ch) in text.chars().enumerate() {
        let escaped = token.is_escaped(i);
        match quote {
            Some(q) => {
                if ch == q && !escaped {
                    quote = None;
                }
                current.push(ch);
            }
            None if ch == '=' && !escaped => {
                if !current.is_empty() {
                    out.push(Piece::Value {
                        text: std::mem::take(&mut current),
                        position: token.source_offset(start),
                    });
                }
                out.push(Piece::Equals {
                    position: token.source_offset(i),
                });
            }
            None => {
                if (ch == '\'' || ch == '"') && !escaped {
                    quote = Some(ch);
                }
                if current.is_empty() {
                    start = i;
                }
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        out.push(Piece::Value {
            text: current,
            position: token.source_offset(start),
        });
    }
}

/// Turn pending pieces into root terms.
fn flush_operators(tree: &mut TermTree, pending: &mut Vec<Piece>) -> Result<()> {
    let pieces: Vec<Piece> = pending.drain(..).collect();
    let mut i = 0;

    while i < pieces.len() {
        match &pieces[i..] {
            [
                Piece::Value { text: column, .. },
                Piece::Equals { .. },
                Piece::Value { text: op, .. },
                Piece::Equals { .. },
                Piece::Value { text: value, .. },
                ..,
            ] => {
                tree.term(None, op.clone(), [column.clone(), value.clone()]);
                i += 5;
            }
            [
                Piece::Value { text: column, .. },
                Piece::Equals { .. },
                Piece::Value { text: value, .. },
                rest @ ..,
            ] if !matches!(rest.first(), Some(Piece::Equals { .. })) => {
                tree.term(None, "eq", [column.clone(), value.clone()]);
                i += 3;
            }
            [Piece::Value { text, .. }, rest @ ..] if !matches!(rest.first(), Some(Piece::Equals { .. })) => {
                tree.leaf(None, text.clone());
                i += 1;
            }
            rest => {
                let end = rest.len().min(5);
                return Err(RqlError::MalformedOperator {
                    clause: render_pieces(&rest[..end]),
                    position: piece_position(&rest[0]),
                });
            }
        }
    }
    Ok(())
}

/// Parse plain RQL text into a term tree.
pub fn parse(input: &str) -> Result<TermTree> {
    Parser::new(Tokenizer::new(input)).parse()
}

/// Parse RQL text that may use `a=b` / `a=op=b` operator forms.
pub fn parse_clause(input: &str) -> Result<TermTree> {
    Parser::new(Tokenizer::new(input)).parse_clause()
}

/// Parse `input` and append its root terms to `tree`.
///
/// `tree` is left untouched when parsing fails.
pub fn parse_into(tree: &mut TermTree, input: &str) -> Result<Vec<TermId>> {
    let parsed = parse(input)?;
    Ok(parsed
        .roots()
        .iter()
        .map(|&root| tree.graft(&parsed, root, None))
        .collect())
}
