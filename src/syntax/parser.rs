use std::{iter::Peekable, vec::IntoIter};

use crate::error::{ErrorKind, PResult};

use super::{
    lexer::Lexer,
    token::{Token, TokenKind},
    ExprParser, Expression,
};

pub(crate) struct Parser<'src> {
    src: &'src str,
    tokens: Peekable<IntoIter<Token<'src>>>,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str) -> PResult<Self> {
        Ok(Self {
            src,
            tokens: Lexer::tokenize(src)?.into_iter().peekable(),
        })
    }

    /// Parses one complete expression; anything after it is an error.
    pub fn parse(&mut self) -> PResult<Expression<'src>> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::End)?;
        log::debug!("parsed `{}` as `{expr}`", self.src);
        Ok(expr)
    }

    /// The lexer always terminates the stream with `End`; reading past it
    /// keeps returning `End`.
    pub(super) fn next_token(&mut self) -> Token<'src> {
        self.tokens
            .next()
            .unwrap_or(Token::new(TokenKind::End, "", self.src.len()))
    }

    pub(super) fn peek_kind(&mut self) -> TokenKind {
        self.tokens.peek().map_or(TokenKind::End, |t| t.kind)
    }

    #[inline(always)]
    pub(super) fn bump(&mut self) {
        let _ = self.tokens.next();
    }

    pub(super) fn expect(&mut self, expected: TokenKind) -> PResult<Token<'src>> {
        let token = self.next_token();
        if token.kind == expected {
            return Ok(token);
        }
        Err(self.error(
            format!(
                "Expected {expected:?} but found {:?} at position {} in '{}'",
                token.kind, token.position, self.src
            ),
            token.position,
        ))
    }

    pub(super) fn unexpected(&self, token: Token<'src>) -> ErrorKind {
        self.error(
            format!(
                "Unexpected token {:?} at position {} in '{}'",
                token.kind, token.position, self.src
            ),
            token.position,
        )
    }

    fn error(&self, message: String, offset: usize) -> ErrorKind {
        ErrorKind::ParseError { message, offset }
    }
}

/// Lexes and parses `src` in one step.
pub(crate) fn parse(src: &str) -> PResult<Expression<'_>> {
    Parser::new(src)?.parse()
}
