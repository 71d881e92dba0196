use crate::error::PResult;

use super::{
    token::{Assoc, Precedence, TokenKind, PREC_NONE, PREC_UNARY},
    ExprParser, Expression, Operator, Parser,
};

impl<'src> ExprParser<'src> for Parser<'src> {
    fn parse_expr(&mut self) -> PResult<Expression<'src>> {
        self.parse_expr_with_precedence(PREC_NONE)
    }

    /// Precedence climbing: keep absorbing infix operators that bind tighter
    /// than `min_prec`. A left-associative operator parses its right side at
    /// its own level, so an equal operator to the right is left for this loop.
    fn parse_expr_with_precedence(&mut self, min_prec: Precedence) -> PResult<Expression<'src>> {
        let mut lhs = self.parse_expr_lhs()?;

        while let Some(op) = self.peek_kind().operator() {
            let (prec, assoc) = op.get();

            if prec <= min_prec {
                break;
            }
            self.bump();

            let new_min_prec = match assoc {
                Assoc::Left => prec,
            };

            let rhs = self.parse_expr_with_precedence(new_min_prec)?;
            lhs = Expression::binary(lhs, op, rhs, prec);
        }

        Ok(lhs)
    }

    fn parse_expr_lhs(&mut self) -> PResult<Expression<'src>> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Number => Ok(Expression::number(token.number)),
            TokenKind::Identifier => Ok(Expression::var(token.text)),
            TokenKind::Plus => self.parse_unary_expr(Operator::Plus),
            TokenKind::Minus => self.parse_unary_expr(Operator::Minus),
            TokenKind::LParen => self.parse_grouping_expr(),
            _ => Err(self.unexpected(token)),
        }
    }

    fn parse_grouping_expr(&mut self) -> PResult<Expression<'src>> {
        let expression = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(expression.parenthesized())
    }

    fn parse_unary_expr(&mut self, op: Operator) -> PResult<Expression<'src>> {
        let operand = self.parse_expr_with_precedence(PREC_UNARY)?;
        Ok(Expression::unary(op, operand))
    }
}

#[cfg(test)]
mod test {
    use crate::syntax::{parse, Expression, Operator};

    fn binary(
        lhs: Expression<'static>,
        op: Operator,
        rhs: Expression<'static>,
    ) -> Expression<'static> {
        Expression::binary(lhs, op, rhs, op.precedence())
    }

    #[test]
    fn parse_binary_expr() {
        use Expression as E;
        use Operator::*;

        let expr = parse("-5 + 4 * 7").unwrap();
        let expected = binary(
            E::unary(Minus, E::number(5)),
            Plus,
            binary(E::number(4), Mul, E::number(7)),
        );

        assert_eq!(expr, expected);
    }

    #[test]
    fn parse_binary_expr_2() {
        use Expression as E;
        use Operator::*;

        let expr = parse("(-5 + 4) * 7").unwrap();
        let expected = binary(
            binary(E::unary(Minus, E::number(5)), Plus, E::number(4)).parenthesized(),
            Mul,
            E::number(7),
        );

        assert_eq!(expr, expected);
    }

    #[test]
    fn left_associative() {
        use Expression as E;
        use Operator::*;

        let expr = parse("8 - 3 - 2").unwrap();
        let expected = binary(binary(E::number(8), Minus, E::number(3)), Minus, E::number(2));
        assert_eq!(expr, expected);

        let expr = parse("8 / 4 * 2").unwrap();
        let expected = binary(binary(E::number(8), Div, E::number(4)), Mul, E::number(2));
        assert_eq!(expr, expected);
    }

    #[test]
    fn unary_binds_tighter_than_mul() {
        use Expression as E;
        use Operator::*;

        let expr = parse("-x*+2").unwrap();
        let expected = binary(
            E::unary(Minus, E::var("x")),
            Mul,
            E::unary(Plus, E::number(2)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn nested_parens_are_one_flag() {
        assert_eq!(parse("((1))").unwrap(), Expression::number(1).parenthesized());
    }

    #[test]
    fn reformat_round_trips() {
        let inputs = [
            "1+2*3",
            "(1+2)*3",
            "8-3-2",
            "8-(3-2)",
            "-(2+3)",
            "--x",
            "-2*-y/(z)",
            "a/(b*c)-((d))",
            "1 - -1",
            "+(+7)",
            "Foo*bar+FOO",
        ];

        for src in inputs {
            let expr = parse(src).unwrap();
            let text = expr.to_string();
            let reparsed = parse(&text).unwrap();
            assert!(expr.same_structure(&reparsed), "{src} -> {text}");
            assert_eq!(reparsed.to_string(), text, "{src}");
        }
    }

    #[test]
    fn reformat_text() {
        assert_eq!(parse("1 + 2 * 3").unwrap().to_string(), "1+2*3");
        assert_eq!(parse("(1 + 2) * 3").unwrap().to_string(), "(1+2)*3");
        assert_eq!(parse("(x)").unwrap().to_string(), "(x)");
        assert_eq!(parse("- - 4").unwrap().to_string(), "--4");
    }
}
