use std::fmt;

use super::token::{Operator, Precedence, PREC_ATOM, PREC_NONE, PREC_UNARY};

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum ExprKind<'src> {
    Number(i64),
    Var(&'src str),
    Unary {
        op: Operator,
        operand: Box<Expression<'src>>,
    },
    Binary {
        lhs: Box<Expression<'src>>,
        op: Operator,
        rhs: Box<Expression<'src>>,
        /// Fixed by the parser, consulted when formatting.
        precedence: Precedence,
    },
}

/// An immutable AST node. `parenthesized` is only set when the source had an
/// explicit `( ... )` around the node.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Expression<'src> {
    pub kind: ExprKind<'src>,
    pub parenthesized: bool,
}

impl<'src> Expression<'src> {
    pub fn number(v: i64) -> Self {
        ExprKind::Number(v).into()
    }

    pub fn var(id: &'src str) -> Self {
        ExprKind::Var(id).into()
    }

    pub fn unary(op: Operator, operand: Expression<'src>) -> Self {
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        }
        .into()
    }

    pub fn binary(
        lhs: Expression<'src>,
        op: Operator,
        rhs: Expression<'src>,
        precedence: Precedence,
    ) -> Self {
        ExprKind::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            precedence,
        }
        .into()
    }

    pub fn parenthesized(mut self) -> Self {
        self.parenthesized = true;
        self
    }

    pub fn precedence(&self) -> Precedence {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Var(_) => PREC_ATOM,
            ExprKind::Unary { .. } => PREC_UNARY,
            ExprKind::Binary { precedence, .. } => *precedence,
        }
    }

    /// Variable names in left-to-right order, duplicates included.
    pub fn variables(&self) -> Variables<'_, 'src> {
        Variables { stack: vec![self] }
    }

    /// Distinct variable names in first-occurrence order. Names compare
    /// case-insensitively; the first spelling seen is kept.
    pub fn variable_list(&self) -> Vec<&'src str> {
        let mut seen: Vec<String> = vec![];
        let mut list: Vec<&'src str> = vec![];
        for id in self.variables() {
            let folded = fold_name(id);
            if !seen.contains(&folded) {
                seen.push(folded);
                list.push(id);
            }
        }
        list
    }

    /// Re-serializes the node as source text. Parentheses are emitted when the
    /// source had them, or when dropping them would change the meaning under
    /// a parent of `parent_prec` (on its right side if `is_right_child`).
    pub fn format(&self, parent_prec: Precedence, is_right_child: bool) -> String {
        let mut out = String::new();
        let mut pending = vec![Piece::Node(self, parent_prec, is_right_child)];

        while let Some(piece) = pending.pop() {
            let (expr, parent_prec, is_right_child) = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Node(expr, parent_prec, is_right_child) => {
                    (expr, parent_prec, is_right_child)
                }
            };

            let prec = expr.precedence();
            let needs_parens = match &expr.kind {
                ExprKind::Number(_) | ExprKind::Var(_) => false,
                ExprKind::Unary { .. } => prec < parent_prec,
                ExprKind::Binary { .. } => {
                    prec < parent_prec || (prec == parent_prec && is_right_child)
                }
            };
            let wrap = expr.parenthesized || needs_parens;

            if wrap {
                out.push('(');
                pending.push(Piece::Text(")"));
            }
            match &expr.kind {
                ExprKind::Number(v) => out.push_str(&v.to_string()),
                ExprKind::Var(id) => out.push_str(id),
                ExprKind::Unary { op, operand } => {
                    out.push_str(op.symbol());
                    pending.push(Piece::Node(operand, prec, false));
                }
                ExprKind::Binary { lhs, op, rhs, .. } => {
                    pending.push(Piece::Node(rhs, prec, true));
                    pending.push(Piece::Text(op.symbol()));
                    pending.push(Piece::Node(lhs, prec, false));
                }
            }
        }

        out
    }

    /// Equality that ignores where parentheses were written.
    #[cfg(test)]
    pub fn same_structure(&self, other: &Expression) -> bool {
        match (&self.kind, &other.kind) {
            (ExprKind::Number(a), ExprKind::Number(b)) => a == b,
            (ExprKind::Var(a), ExprKind::Var(b)) => a == b,
            (
                ExprKind::Unary { op, operand },
                ExprKind::Unary {
                    op: other_op,
                    operand: other_operand,
                },
            ) => op == other_op && operand.same_structure(other_operand),
            (
                ExprKind::Binary {
                    lhs,
                    op,
                    rhs,
                    precedence,
                },
                ExprKind::Binary {
                    lhs: other_lhs,
                    op: other_op,
                    rhs: other_rhs,
                    precedence: other_precedence,
                },
            ) => {
                op == other_op
                    && precedence == other_precedence
                    && lhs.same_structure(other_lhs)
                    && rhs.same_structure(other_rhs)
            }
            _ => false,
        }
    }
}

/// Case folding used for variable identity.
pub(crate) fn fold_name(id: &str) -> String {
    id.to_lowercase()
}

/// Pending output of [`Expression::format`].
enum Piece<'a, 'src> {
    Node(&'a Expression<'src>, Precedence, bool),
    Text(&'static str),
}

/// Unlinks children onto a heap stack so deep trees don't recurse on drop.
impl Drop for Expression<'_> {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Expression>> = vec![];
        take_children(&mut self.kind, &mut pending);
        while let Some(mut expr) = pending.pop() {
            take_children(&mut expr.kind, &mut pending);
        }
    }
}

fn take_children<'src>(kind: &mut ExprKind<'src>, pending: &mut Vec<Box<Expression<'src>>>) {
    match std::mem::replace(kind, ExprKind::Number(0)) {
        ExprKind::Unary { operand, .. } => pending.push(operand),
        ExprKind::Binary { lhs, rhs, .. } => {
            pending.push(lhs);
            pending.push(rhs);
        }
        ExprKind::Number(_) | ExprKind::Var(_) => (),
    }
}

impl<'src> From<ExprKind<'src>> for Expression<'src> {
    fn from(kind: ExprKind<'src>) -> Self {
        Self {
            kind,
            parenthesized: false,
        }
    }
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(PREC_NONE, false))
    }
}

/// Lazy pre-order walk yielding variable names.
pub(crate) struct Variables<'a, 'src> {
    stack: Vec<&'a Expression<'src>>,
}

impl<'a, 'src> Iterator for Variables<'a, 'src> {
    type Item = &'src str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(expr) = self.stack.pop() {
            match &expr.kind {
                ExprKind::Number(_) => (),
                ExprKind::Var(id) => return Some(*id),
                ExprKind::Unary { operand, .. } => self.stack.push(operand),
                ExprKind::Binary { lhs, rhs, .. } => {
                    self.stack.push(rhs);
                    self.stack.push(lhs);
                }
            }
        }
        None
    }
}
