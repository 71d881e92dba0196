mod expr;
mod expr_parser;
mod lexer;
mod parser;
mod token;

pub(crate) use expr::{fold_name, ExprKind, Expression};
pub(crate) use parser::{parse, Parser};
pub(crate) use token::{Operator, Precedence};

use crate::error::PResult;

pub(crate) trait ExprParser<'src> {
    fn parse_expr(&mut self) -> PResult<Expression<'src>>;
    fn parse_expr_with_precedence(&mut self, min_prec: Precedence) -> PResult<Expression<'src>>;
    fn parse_expr_lhs(&mut self) -> PResult<Expression<'src>>;
    fn parse_grouping_expr(&mut self) -> PResult<Expression<'src>>;
    fn parse_unary_expr(&mut self, op: Operator) -> PResult<Expression<'src>>;
}
