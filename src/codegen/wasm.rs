use wasm_encoder::{
    CodeSection, EntityType, ExportKind, ExportSection, Function, FunctionSection, ImportSection,
    Instruction as Ins, Module, TypeSection, ValType,
};

use crate::error::{ErrorKind, PResult};

use super::{CompiledExpr, Instruction};

const TRACE_TYPE: u32 = 0;
const EVALUATE_TYPE: u32 = 1;
/// Imported functions come first in the function index space.
const TRACE_FUNC: u32 = 0;
const EVALUATE_FUNC: u32 = 1;

/// Encodes the compiled expression as a module importing
/// `env.trace(label: i32, value: i64)` and exporting `evaluate`, which takes
/// one `i64` per variable in variable-list order.
pub(crate) fn emit_wasm(compiled: &CompiledExpr) -> Vec<u8> {
    let arity = compiled.variables.len();

    let mut types = TypeSection::new();
    types.function(vec![ValType::I32, ValType::I64], Vec::<ValType>::new());
    types.function(vec![ValType::I64; arity], vec![ValType::I64]);

    let mut imports = ImportSection::new();
    imports.import("env", "trace", EntityType::Function(TRACE_TYPE));

    let mut functions = FunctionSection::new();
    functions.function(EVALUATE_TYPE);

    let mut exports = ExportSection::new();
    exports.export("evaluate", ExportKind::Func, EVALUATE_FUNC);

    // One scratch local right after the parameters.
    let scratch = arity as u32;
    let locals: Vec<(u32, ValType)> = vec![(1, ValType::I64)];
    let mut f = Function::new(locals);

    for ins in &compiled.instructions {
        match *ins {
            Instruction::Const(v) => {
                f.instruction(&Ins::I64Const(v));
            }
            Instruction::Load(slot) => {
                f.instruction(&Ins::LocalGet(slot as u32));
            }
            Instruction::Neg => {
                f.instruction(&Ins::I64Const(-1));
                f.instruction(&Ins::I64Mul);
            }
            Instruction::Add => {
                f.instruction(&Ins::I64Add);
            }
            Instruction::Sub => {
                f.instruction(&Ins::I64Sub);
            }
            Instruction::Mul => {
                f.instruction(&Ins::I64Mul);
            }
            Instruction::Div => {
                f.instruction(&Ins::I64DivS);
            }
            Instruction::Trace(label) => {
                f.instruction(&Ins::LocalSet(scratch));
                f.instruction(&Ins::I32Const(label as i32));
                f.instruction(&Ins::LocalGet(scratch));
                f.instruction(&Ins::Call(TRACE_FUNC));
                f.instruction(&Ins::LocalGet(scratch));
            }
        }
    }
    f.instruction(&Ins::End);

    let mut code = CodeSection::new();
    code.function(&f);

    let mut module = Module::new();
    module.section(&types);
    module.section(&imports);
    module.section(&functions);
    module.section(&exports);
    module.section(&code);

    let bytes = module.finish();
    log::debug!("emitted {} bytes of wasm", bytes.len());
    bytes
}

/// Text form of [`emit_wasm`].
pub(crate) fn emit_wat(compiled: &CompiledExpr) -> PResult<String> {
    wasmprinter::print_bytes(emit_wasm(compiled))
        .map_err(|why| ErrorKind::CompileError(format!("Failed to print wasm: {why}")))
}

#[cfg(test)]
mod test {
    use super::{emit_wasm, emit_wat};
    use crate::codegen::build;

    #[test]
    fn wasm_header() {
        let bytes = emit_wasm(&build("1+2").unwrap());
        assert_eq!(&bytes[..8], b"\0asm\x01\0\0\0");
    }

    #[test]
    fn wat_shape() {
        let wat = emit_wat(&build("-x/y").unwrap()).unwrap();

        assert!(wat.contains("(import \"env\" \"trace\""), "{wat}");
        assert!(wat.contains("(export \"evaluate\""), "{wat}");
        assert!(wat.contains("(param i64 i64) (result i64)"), "{wat}");
        assert!(wat.contains("i64.div_s"), "{wat}");
        assert_eq!(wat.matches("local.set").count(), 2, "{wat}");
    }

    #[test]
    fn constant_expression_takes_no_params() {
        let wat = emit_wat(&build("7").unwrap()).unwrap();
        assert!(wat.contains("i64.const 7"), "{wat}");
        assert!(!wat.contains("(param i64"), "{wat}");
    }
}
