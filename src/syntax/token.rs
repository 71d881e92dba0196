use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Plus,
    Minus,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assoc {
    Left,
}

pub(crate) type Precedence = u8;

/// Boundary of a whole expression; every operator binds tighter.
pub(crate) const PREC_NONE: Precedence = 0;
pub(crate) const PREC_UNARY: Precedence = 30;
/// Leaves never need parentheses of their own.
pub(crate) const PREC_ATOM: Precedence = Precedence::MAX;

impl Operator {
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Plus | Self::Minus => 10,
            Self::Mul | Self::Div => 20,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            Self::Plus | Self::Minus | Self::Mul | Self::Div => Assoc::Left,
        }
    }

    pub fn get(self) -> (Precedence, Assoc) {
        (self.precedence(), self.assoc())
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Number,
    Identifier,
    Plus,
    Minus,
    Multiply,
    Divide,
    LParen,
    RParen,
    End,
}

impl TokenKind {
    /// The binary operator this token stands for in infix position.
    pub fn operator(self) -> Option<Operator> {
        match self {
            Self::Plus => Some(Operator::Plus),
            Self::Minus => Some(Operator::Minus),
            Self::Multiply => Some(Operator::Mul),
            Self::Divide => Some(Operator::Div),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// Only meaningful for `TokenKind::Number`.
    pub number: i64,
    pub position: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, position: usize) -> Self {
        Self {
            kind,
            text,
            number: 0,
            position,
        }
    }

    pub fn number(text: &'src str, number: i64, position: usize) -> Self {
        Self {
            kind: TokenKind::Number,
            text,
            number,
            position,
        }
    }
}
