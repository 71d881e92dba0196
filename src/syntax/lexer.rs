use std::{iter::Peekable, str::CharIndices};

use crate::error::{ErrorKind, PResult};

use super::token::{Token, TokenKind};

/// Single forward scan over the source. Yields exactly one `End` token at
/// the input length and then stops; the first error also ends the stream.
pub(crate) struct Lexer<'src> {
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
    done: bool,
}

impl<'src> Iterator for Lexer<'src> {
    type Item = PResult<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let token = match self.chars.next() {
            None => Ok(Token::new(TokenKind::End, "", self.src.len())),
            Some((off, '+')) => Ok(self.single(TokenKind::Plus, off)),
            Some((off, '-')) => Ok(self.single(TokenKind::Minus, off)),
            Some((off, '*')) => Ok(self.single(TokenKind::Multiply, off)),
            Some((off, '/')) => Ok(self.single(TokenKind::Divide, off)),
            Some((off, '(')) => Ok(self.single(TokenKind::LParen, off)),
            Some((off, ')')) => Ok(self.single(TokenKind::RParen, off)),
            Some((off, c)) => {
                if c.is_whitespace() {
                    return self.next();
                }
                if c.is_digit(10) {
                    self.read_number(off)
                } else if Self::is_id_start(c) {
                    Ok(self.read_id(off))
                } else {
                    Err(ErrorKind::LexError {
                        message: format!("Unexpected character '{c}' at position {off}"),
                        offset: off,
                    })
                }
            }
        };

        if !matches!(&token, Ok(t) if t.kind != TokenKind::End) {
            self.done = true;
        }
        Some(token)
    }
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            done: false,
        }
    }

    /// Collects the whole token stream, `End` included.
    pub fn tokenize(src: &'src str) -> PResult<Vec<Token<'src>>> {
        let tokens = Self::new(src).collect::<PResult<Vec<_>>>()?;
        log::debug!("lexed {} tokens from {src:?}", tokens.len());
        Ok(tokens)
    }

    #[inline]
    fn bump(&mut self) {
        let _ = self.chars.next();
    }

    fn single(&self, kind: TokenKind, off: usize) -> Token<'src> {
        Token::new(kind, &self.src[off..off + 1], off)
    }

    fn slice_until<P>(&mut self, from_off: usize, predicate: P) -> &'src str
    where
        P: Fn(char) -> bool,
    {
        while let Some(&(off, c)) = self.chars.peek() {
            if predicate(c) {
                return &self.src[from_off..off];
            }
            self.bump();
        }
        &self.src[from_off..self.src.len()]
    }

    fn read_number(&mut self, from_off: usize) -> PResult<Token<'src>> {
        let s = self.slice_until(from_off, |c| !c.is_digit(10));
        match s.parse::<i64>() {
            Ok(v) => Ok(Token::number(s, v, from_off)),
            Err(why) => Err(ErrorKind::LexError {
                message: format!("Invalid number literal `{s}` at position {from_off}: {why}"),
                offset: from_off,
            }),
        }
    }

    fn read_id(&mut self, from_off: usize) -> Token<'src> {
        let s = self.slice_until(from_off, |c| !Self::is_id_part(c));
        Token::new(TokenKind::Identifier, s, from_off)
    }

    fn is_id_start(c: char) -> bool {
        c.is_alphabetic()
    }

    fn is_id_part(c: char) -> bool {
        Self::is_id_start(c) || c.is_digit(10)
    }
}

#[cfg(test)]
mod test {
    use super::{
        super::token::{Token, TokenKind},
        Lexer,
    };
    use crate::error::ErrorKind;

    fn kinds(s: &str) -> Vec<TokenKind> {
        Lexer::tokenize(s)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn read_number() {
        let tokens = Lexer::tokenize("48 1024 \n9").unwrap();
        let expected = &[
            Token::number("48", 48, 0),
            Token::number("1024", 1024, 3),
            Token::number("9", 9, 9),
            Token::new(TokenKind::End, "", 10),
        ];

        assert_eq!(tokens, expected);
    }

    #[test]
    fn read_operators_and_ids() {
        use TokenKind::*;

        assert_eq!(
            kinds("(Foo1 + x)*-2/y"),
            vec![
                LParen, Identifier, Plus, Identifier, RParen, Multiply, Minus, Number, Divide,
                Identifier, End
            ]
        );
    }

    #[test]
    fn id_keeps_case_and_digits() {
        let tokens = Lexer::tokenize("Abc12d").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Identifier, "Abc12d", 0));
    }

    #[test]
    fn digits_then_letters_split() {
        assert_eq!(
            kinds("2x"),
            vec![TokenKind::Number, TokenKind::Identifier, TokenKind::End]
        );
    }

    #[test]
    fn empty_input_is_just_end() {
        assert_eq!(
            Lexer::tokenize("   ").unwrap(),
            vec![Token::new(TokenKind::End, "", 3)]
        );
    }

    #[test]
    fn invalid_char() {
        let err = Lexer::tokenize("4 $ 7").unwrap_err();
        assert!(matches!(err, ErrorKind::LexError { offset: 2, .. }));
    }

    #[test]
    fn number_overflow() {
        let err = Lexer::tokenize("1 + 9223372036854775808").unwrap_err();
        assert!(matches!(err, ErrorKind::LexError { offset: 4, .. }));
        assert!(Lexer::tokenize("9223372036854775807").is_ok());
    }

    #[test]
    fn stream_ends_after_error() {
        let mut lexer = Lexer::new("$1");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
