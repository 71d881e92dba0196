use crate::{
    error::{ErrorKind, PResult},
    syntax::{self, fold_name, ExprKind, Expression, Operator},
};

enum Visit<'a, 'src> {
    Enter(&'a Expression<'src>),
    Exit(&'a Expression<'src>),
}

/// Flat stack-machine code. `Load` reads an argument slot, `Trace` reports the
/// top of the stack under a label without popping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Instruction {
    Const(i64),
    Load(usize),
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Trace(usize),
}

/// A self-contained evaluator: it keeps no reference to the tree it was
/// lowered from. Argument `i` of an invocation binds `variables[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledExpr {
    pub(crate) variables: Vec<String>,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) labels: Vec<String>,
    pub(crate) max_stack: usize,
}

impl CompiledExpr {
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

pub(crate) struct Compiler<'a> {
    variables: &'a [&'a str],
    instructions: Vec<Instruction>,
    labels: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Compiler<'a> {
    /// Lowers `root` in post-order. `variables` fixes the argument slots and
    /// must cover every variable the tree mentions.
    pub fn compile(root: &Expression, variables: &'a [&'a str]) -> PResult<CompiledExpr> {
        let mut compiler = Self {
            variables,
            instructions: vec![],
            labels: vec![],
            depth: 0,
            max_depth: 0,
        };
        compiler.compile_expr(root)?;

        log::debug!(
            "compiled `{root}` into {} instructions over {variables:?}",
            compiler.instructions.len()
        );

        Ok(CompiledExpr {
            variables: variables.iter().map(|id| id.to_string()).collect(),
            instructions: compiler.instructions,
            labels: compiler.labels,
            max_stack: compiler.max_depth,
        })
    }

    /// Post-order walk over an explicit stack so chain length is not bounded
    /// by the thread stack.
    fn compile_expr(&mut self, root: &Expression) -> PResult<()> {
        let mut pending = vec![Visit::Enter(root)];

        while let Some(visit) = pending.pop() {
            match visit {
                Visit::Enter(expr) => match &expr.kind {
                    ExprKind::Number(v) => self.push(Instruction::Const(*v)),
                    ExprKind::Var(id) => {
                        let slot = self.slot(id)?;
                        self.push(Instruction::Load(slot));
                    }
                    ExprKind::Unary { operand, .. } => {
                        pending.push(Visit::Exit(expr));
                        pending.push(Visit::Enter(operand));
                    }
                    ExprKind::Binary { lhs, rhs, .. } => {
                        pending.push(Visit::Exit(expr));
                        pending.push(Visit::Enter(rhs));
                        pending.push(Visit::Enter(lhs));
                    }
                },
                Visit::Exit(expr) => {
                    match &expr.kind {
                        ExprKind::Unary { op, .. } => match op {
                            Operator::Plus => (),
                            Operator::Minus => self.push(Instruction::Neg),
                            other => {
                                return Err(ErrorKind::CompileError(format!(
                                    "Unsupported unary operator {other}"
                                )))
                            }
                        },
                        ExprKind::Binary { op, .. } => {
                            let ins = match op {
                                Operator::Plus => Instruction::Add,
                                Operator::Minus => Instruction::Sub,
                                Operator::Mul => Instruction::Mul,
                                Operator::Div => Instruction::Div,
                            };
                            self.push(ins);
                        }
                        ExprKind::Number(_) | ExprKind::Var(_) => (),
                    }
                    self.trace(expr);
                }
            }
        }
        Ok(())
    }

    fn slot(&self, id: &str) -> PResult<usize> {
        self.variables
            .iter()
            .position(|v| fold_name(v) == fold_name(id))
            .ok_or_else(|| {
                ErrorKind::CompileError(format!("Variable `{id}` is missing from the variable list"))
            })
    }

    fn trace(&mut self, expr: &Expression) {
        self.labels.push(expr.to_string());
        self.push(Instruction::Trace(self.labels.len() - 1));
    }

    fn push(&mut self, ins: Instruction) {
        match ins {
            Instruction::Const(_) | Instruction::Load(_) => {
                self.depth += 1;
                self.max_depth = self.max_depth.max(self.depth);
            }
            Instruction::Add | Instruction::Sub | Instruction::Mul | Instruction::Div => {
                self.depth -= 1;
            }
            Instruction::Neg | Instruction::Trace(_) => (),
        }
        log::trace!("{ins:?}");
        self.instructions.push(ins);
    }
}

/// Lexes, parses and lowers `src`, deriving the variable list from the tree.
pub(crate) fn build(src: &str) -> PResult<CompiledExpr> {
    let root = syntax::parse(src)?;
    let variables = root.variable_list();
    Compiler::compile(&root, &variables)
}

#[cfg(test)]
mod test {
    use super::{build, Compiler, Instruction};
    use crate::{
        error::ErrorKind,
        syntax::{parse, Expression, Operator},
    };

    #[test]
    fn post_order_with_traces() {
        use Instruction::*;

        let compiled = build("1+2*3").unwrap();
        assert_eq!(
            compiled.instructions,
            vec![Const(1), Const(2), Const(3), Mul, Trace(0), Add, Trace(1)]
        );
        assert_eq!(compiled.labels, vec!["2*3", "1+2*3"]);
        assert_eq!(compiled.max_stack, 3);
    }

    #[test]
    fn leaves_are_not_traced() {
        let compiled = build("(x)").unwrap();
        assert_eq!(compiled.instructions, vec![Instruction::Load(0)]);
        assert!(compiled.labels.is_empty());
    }

    #[test]
    fn unary_plus_is_traced_but_emits_nothing() {
        use Instruction::*;

        let compiled = build("+-4").unwrap();
        assert_eq!(compiled.instructions, vec![Const(4), Neg, Trace(0), Trace(1)]);
        assert_eq!(compiled.labels, vec!["-4", "+-4"]);
    }

    #[test]
    fn labels_render_subtree_as_root() {
        let compiled = build("(a+b)*(c-d)").unwrap();
        assert_eq!(compiled.labels, vec!["(a+b)", "(c-d)", "(a+b)*(c-d)"]);

        let compiled = build("8-(3-2)").unwrap();
        assert_eq!(compiled.labels, vec!["(3-2)", "8-(3-2)"]);
    }

    #[test]
    fn slots_follow_variable_list() {
        use Instruction::*;

        let compiled = build("y*X+x").unwrap();
        assert_eq!(compiled.variables(), &["y".to_string(), "X".to_string()]);
        assert_eq!(
            compiled.instructions,
            vec![Load(0), Load(1), Mul, Trace(0), Load(1), Add, Trace(1)]
        );
        assert_eq!(compiled.labels(), &["y*X".to_string(), "y*X+x".to_string()]);
    }

    #[test]
    fn non_ascii_names_share_a_slot() {
        use Instruction::*;

        let compiled = build("Äpfel*äpfel").unwrap();
        assert_eq!(compiled.variables(), &["Äpfel".to_string()]);
        assert_eq!(
            compiled.instructions,
            vec![Load(0), Load(0), Mul, Trace(0)]
        );
    }

    #[test]
    fn long_chain_compiles() {
        let src = format!("1{}", "+1".repeat(5000));
        let compiled = build(&src).unwrap();

        assert_eq!(compiled.labels.len(), 5000);
        assert_eq!(compiled.max_stack, 2);
        assert_eq!(compiled.call(&[], &mut Vec::<(String, i64)>::new()).unwrap(), 5001);
    }

    #[test]
    fn missing_variable_is_compile_error() {
        let root = parse("a+b").unwrap();
        let err = Compiler::compile(&root, &["a"]).unwrap_err();
        assert!(matches!(err, ErrorKind::CompileError(_)));
    }

    #[test]
    fn unknown_unary_operator_is_compile_error() {
        let root = Expression::unary(Operator::Mul, Expression::number(1));
        let err = Compiler::compile(&root, &[]).unwrap_err();
        assert!(matches!(err, ErrorKind::CompileError(_)));
    }

    #[test]
    fn build_reports_parse_errors() {
        assert!(matches!(build("1+"), Err(ErrorKind::ParseError { .. })));
    }
}
