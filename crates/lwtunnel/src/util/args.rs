//! Cursor over pre-split command arguments.

/// Read position in an argument vector.
///
/// Tokens are handed out front to back and never re-read. The cursor only
/// moves forward, one token per successful [`next_arg`](Self::next_arg).
#[derive(Debug, Clone)]
pub struct TokenCursor<'a, S> {
    tokens: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> TokenCursor<'a, S> {
    /// Start at the first token.
    pub fn new(tokens: &'a [S]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Consume the next token.
    pub fn next_arg(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_ref())
    }

    /// Look at the next token without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(AsRef::as_ref)
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of tokens left.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    /// Check if every token has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The tokens not consumed yet.
    pub fn rest(&self) -> &'a [S] {
        &self.tokens[self.pos..]
    }
}
