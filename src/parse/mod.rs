use std::hash;

pub(crate) mod error;
pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod token;

use self::token::Token;
use crate::Source;

type CharPos = usize;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: CharPos,
    pub end: CharPos,
}

impl Span {
    pub fn new(start: CharPos, end: CharPos) -> Self {
        Span { start, end }
    }
}

#[derive(Debug)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(start: CharPos, end: CharPos, node: T) -> Self {
        let span = Span { start, end };

        Spanned { span, node }
    }
}

impl<T: Clone> Clone for Spanned<T> {
    fn clone(&self) -> Self {
        Self {
            span: self.span,
            node: self.node.clone(),
        }
    }
}

impl<T: Copy> Copy for Spanned<T> {}

impl<T: hash::Hash> hash::Hash for Spanned<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.span == other.span
    }
}

impl<T: PartialEq> Eq for Spanned<T> {}

/// A lookahead window over the token stream.
///
/// `peek(0)` is the next unconsumed token and `peek(1)` the one after it.
/// Once the input is exhausted, both peeking and consuming keep yielding
/// `Token::Eof`.
pub trait TokenSource<'src> {
    fn peek(&self, ahead: usize) -> &Spanned<Token<'src>>;
    fn next_token(&mut self) -> Spanned<Token<'src>>;
    fn source(&self) -> &'src Source;
}
