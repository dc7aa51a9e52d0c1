//! The lowering walk: turns an analyzed AST into a [`Module`] of IR
//! [`Function`]s. One [`Lowerer`] per compilation; its per-function state
//! (label counter, break/continue label stacks, variable scopes) is reset
//! between top-level functions, methods, and lambdas, matching the
//! analyzer's own scope-stack discipline.

mod class;
mod expr;
mod stmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use gdsc_par::ast::{self, Stmt};
use gdsc_sem::AnalysisResult;
use gdsc_util::Symbol;

use crate::block::BasicBlock;
use crate::error::LowerError;
use crate::function::Function;
use crate::instruction::{Instruction, Opcode};
use crate::register::{Register, RegisterKind};

/// Every function the program lowers to, in source order (top-level
/// functions and class methods), plus an implicit `main` carrying any
/// top-level statements that are not themselves declarations — scripts in
/// this language have no explicit entry point, so the lowerer synthesizes
/// one the way an interpreter would run the file's top level.
pub struct Module {
    pub functions: Vec<Function>,
}

pub fn lower_program(program: &ast::Program, analysis: &AnalysisResult) -> Result<Module, LowerError> {
    let mut lowerer = Lowerer::new(analysis);
    lowerer.lower_program(program)?;
    Ok(Module { functions: lowerer.functions })
}

/// A per-function variable scope: symbol name to the register currently
/// holding its value. Scopes are pushed on block entry and popped on
/// exit, mirroring `gdsc-sem`'s `ScopeTree` but carrying registers
/// instead of types.
type VarScope = FxHashMap<Symbol, Register>;

pub(crate) struct Lowerer<'a> {
    pub(crate) analysis: &'a AnalysisResult,
    pub(crate) functions: Vec<Function>,
    pub(crate) reg_counter: u32,
    pub(crate) label_counter: u32,
    pub(crate) var_scopes: Vec<VarScope>,
    pub(crate) break_labels: Vec<String>,
    pub(crate) continue_labels: Vec<String>,
    pub(crate) current_class: Option<Symbol>,
    /// Member-variable registers of the class currently being lowered,
    /// shared by every one of its methods.
    pub(crate) class_members: FxHashMap<Symbol, Register>,
    pub(crate) current: Function,
}

impl<'a> Lowerer<'a> {
    fn new(analysis: &'a AnalysisResult) -> Self {
        Lowerer {
            analysis,
            functions: Vec::new(),
            reg_counter: 0,
            label_counter: 0,
            var_scopes: vec![VarScope::default()],
            break_labels: Vec::new(),
            continue_labels: Vec::new(),
            current_class: None,
            class_members: FxHashMap::default(),
            current: Function::new("__unset__"),
        }
    }

    fn lower_program(&mut self, program: &ast::Program) -> Result<(), LowerError> {
        debug!(statements = program.statements.len(), "lowering program to IR");
        let mut main_stmts = Vec::new();
        for stmt in &program.statements {
            match stmt {
                Stmt::Func(f) => self.lower_top_level_function(f)?,
                Stmt::Class(c) if c.name.is_some() => self.lower_class(c)?,
                Stmt::Class(_) | Stmt::Signal(_) | Stmt::Enum(_) => {}
                other => main_stmts.push(other.clone()),
            }
        }
        if !main_stmts.is_empty() {
            self.lower_main(&main_stmts)?;
        }
        Ok(())
    }

    fn lower_main(&mut self, stmts: &[Stmt]) -> Result<(), LowerError> {
        self.begin_function("main", &[]);
        for stmt in stmts {
            self.lower_stmt(stmt)?;
        }
        self.finish_function(false);
        Ok(())
    }

    fn lower_top_level_function(&mut self, f: &ast::FuncDecl) -> Result<(), LowerError> {
        let params: Vec<Symbol> = f.params.iter().map(|p| p.name).collect();
        self.begin_function(f.name.as_str(), &params);
        for stmt in &f.body.statements {
            self.lower_stmt(stmt)?;
        }
        let returns_value = f.return_type.is_some();
        self.finish_function(returns_value);
        Ok(())
    }

    /// Starts a fresh [`Function`], binding `param_names` as its
    /// parameter registers and resetting the per-function label/scope
    /// state. Callers finish with [`Lowerer::finish_function`].
    pub(crate) fn begin_function(&mut self, name: &str, param_names: &[Symbol]) {
        self.label_counter = 0;
        self.var_scopes = vec![VarScope::default()];
        self.break_labels.clear();
        self.continue_labels.clear();

        let mut function = Function::new(name);
        let entry_label = self.next_label("entry");
        function.push_block(BasicBlock::new(entry_label));
        self.current = function;

        for param_name in param_names {
            let reg = self.mint_register(RegisterKind::General, param_name.as_str());
            self.current.parameters.push(reg.clone());
            self.define_var(*param_name, reg);
        }
    }

    /// After lowering a function body, appends a `RET` if the last
    /// instruction isn't one already — `MOV 0` first when the function is
    /// declared to return a value.
    pub(crate) fn finish_function(&mut self, returns_value: bool) {
        let needs_ret = !matches!(
            self.current.current_block_mut().instructions.last().map(|i| i.opcode),
            Some(Opcode::Ret)
        );
        if needs_ret {
            if returns_value {
                let zero = self.mint_register(RegisterKind::General, &self.next_temp_name());
                self.emit(Instruction::with_immediate(Opcode::Mov, vec![zero.clone()], 0));
                self.current.return_register = Some(zero.clone());
                self.emit(Instruction::new(Opcode::Ret, vec![zero]));
            } else {
                self.emit(Instruction::new(Opcode::Ret, vec![]));
            }
        }
        self.link_branches();
        let function = std::mem::replace(&mut self.current, Function::new("__unset__"));
        self.functions.push(function);
    }

    /// Resolves the successor/predecessor graph for the function just
    /// lowered by scanning every branch instruction's label, now that
    /// every block it could target has been created.
    fn link_branches(&mut self) {
        let mut edges = Vec::new();
        for block in &self.current.blocks {
            for instruction in &block.instructions {
                if instruction.opcode.is_jump() {
                    if let Some(target) = &instruction.label {
                        edges.push((block.label.clone(), target.clone()));
                    }
                }
            }
        }
        for (from, to) in edges {
            self.current.link(&from, &to);
        }
    }

    pub(crate) fn mint_register(&mut self, kind: RegisterKind, name: &str) -> Register {
        let id = self.reg_counter;
        self.reg_counter += 1;
        Register::new(id, kind, format!("{}_{}", name, id))
    }

    pub(crate) fn next_temp_name(&self) -> String {
        format!("t{}", self.reg_counter)
    }

    pub(crate) fn next_label(&mut self, prefix: &str) -> String {
        let label = format!("{}_{}", prefix, self.label_counter);
        self.label_counter += 1;
        label
    }

    pub(crate) fn emit(&mut self, instruction: Instruction) {
        self.current.current_block_mut().push(instruction);
    }

    pub(crate) fn enter_block(&mut self, label: String) {
        self.current.push_block(BasicBlock::new(label));
    }

    pub(crate) fn enter_scope(&mut self) {
        self.var_scopes.push(VarScope::default());
    }

    pub(crate) fn exit_scope(&mut self) {
        self.var_scopes.pop();
    }

    pub(crate) fn define_var(&mut self, name: Symbol, reg: Register) {
        self.var_scopes.last_mut().expect("at least one scope is always active").insert(name, reg);
    }

    pub(crate) fn resolve_var(&self, name: Symbol) -> Option<Register> {
        self.var_scopes.iter().rev().find_map(|scope| scope.get(&name).cloned()).or_else(|| self.class_members.get(&name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_lex::tokenize;
    use gdsc_par::parse;
    use gdsc_sem::analyze;

    fn lower_src(src: &str) -> Module {
        let (tokens, lh) = tokenize(src);
        assert!(!lh.has_errors(), "{:?}", lh.diagnostics());
        let (program, ph) = parse(&tokens);
        assert!(!ph.has_errors(), "{:?}", ph.diagnostics());
        let analysis = analyze(&program);
        assert!(!analysis.handler.has_errors(), "{:?}", analysis.handler.diagnostics());
        lower_program(&program, &analysis).expect("lowering should not fail on well-formed input")
    }

    /// S6: `func f(): return 0` lowers to a function whose body ends in
    /// a `MOV` of the immediate `0` followed by `RET`.
    #[test]
    fn s6_function_returning_zero_lowers_to_mov_and_ret() {
        let module = lower_src("func f():\n    return 0\n");
        let f = module.functions.iter().find(|f| f.name == "f").expect("function f was lowered");
        let last_block = f.blocks.last().unwrap();
        let last = last_block.instructions.last().unwrap();
        assert_eq!(last.opcode, Opcode::Ret);
        let mov = last_block.instructions.iter().rev().find(|i| i.opcode == Opcode::Mov).unwrap();
        assert!(mov.has_immediate);
        assert_eq!(mov.immediate, 0);
    }

    #[test]
    fn top_level_statements_lower_into_a_synthesized_main() {
        let module = lower_src("var a = 1\nprint(a)\n");
        let main = module.functions.iter().find(|f| f.name == "main").expect("top-level statements lower into main");
        assert!(main.blocks.iter().any(|b| b.instructions.iter().any(|i| i.opcode == Opcode::Call)));
    }

    #[test]
    fn function_without_any_return_gets_one_synthesized() {
        let module = lower_src("func f():\n    pass\n");
        let f = module.functions.iter().find(|f| f.name == "f").unwrap();
        let last = f.blocks.last().unwrap().instructions.last().unwrap();
        assert_eq!(last.opcode, Opcode::Ret);
    }

    #[test]
    fn if_statement_lowers_to_compare_and_conditional_jump() {
        let module = lower_src("func f():\n    if 1:\n        pass\n    else:\n        pass\n");
        let f = module.functions.iter().find(|f| f.name == "f").unwrap();
        let all: Vec<_> = f.blocks.iter().flat_map(|b| &b.instructions).collect();
        assert!(all.iter().any(|i| i.opcode == Opcode::Cmp));
        assert!(all.iter().any(|i| i.opcode == Opcode::Je));
    }

    #[test]
    fn while_loop_break_and_continue_jump_to_loop_labels() {
        let module = lower_src("func f():\n    while 1:\n        break\n        continue\n");
        let f = module.functions.iter().find(|f| f.name == "f").unwrap();
        let jmp_count = f.blocks.iter().flat_map(|b| &b.instructions).filter(|i| i.opcode == Opcode::Jmp).count();
        // the loop's own back-edge plus break and continue
        assert!(jmp_count >= 3);
    }

    #[test]
    fn break_outside_loop_is_an_orphan_lower_error() {
        // The analyzer normally rejects this before lowering runs; here we
        // drive the lowerer directly with a hand-parsed program to exercise
        // the defensive check from `LowerError::OrphanBreak`.
        let (tokens, _) = tokenize("break\n");
        let (program, _) = parse(&tokens);
        let analysis = gdsc_sem::analyze(&program);
        let result = lower_program(&program, &analysis);
        assert!(matches!(result, Err(LowerError::OrphanBreak)));
    }

    #[test]
    fn for_in_emits_iterator_protocol_calls() {
        let module = lower_src("func f():\n    for x in \"ab\":\n        pass\n");
        let f = module.functions.iter().find(|f| f.name == "f").unwrap();
        let calls: Vec<_> = f
            .blocks
            .iter()
            .flat_map(|b| &b.instructions)
            .filter(|i| i.opcode == Opcode::Call)
            .filter_map(|i| i.label.as_deref())
            .collect();
        assert!(calls.contains(&"_iterator_valid"));
        assert!(calls.contains(&"_iterator_get"));
        assert!(calls.contains(&"_iterator_next"));
    }

    #[test]
    fn match_statement_compares_scrutinee_against_each_pattern() {
        let module = lower_src("func f():\n    match 3:\n        1:\n            pass\n        2:\n            pass\n");
        let f = module.functions.iter().find(|f| f.name == "f").unwrap();
        let cmp_count = f.blocks.iter().flat_map(|b| &b.instructions).filter(|i| i.opcode == Opcode::Cmp).count();
        assert_eq!(cmp_count, 2);
    }

    #[test]
    fn class_method_is_lowered_with_mangled_name_and_self_parameter() {
        let module = lower_src("class C:\n    func greet():\n        return 1\n");
        let method = module.functions.iter().find(|f| f.name == "C_greet").expect("method lowers under ClassName_method");
        assert_eq!(method.parameters.len(), 1);
        assert_eq!(method.parameters[0].name.as_str(), "self_0");
    }

    #[test]
    fn static_method_has_no_implicit_self_parameter() {
        let module = lower_src("class C:\n    static func greet():\n        return 1\n");
        let method = module.functions.iter().find(|f| f.name == "C_greet").unwrap();
        assert!(method.parameters.is_empty());
    }

    #[test]
    fn builtin_call_dispatches_to_the_builtin_prefixed_runtime_symbol() {
        let module = lower_src("print(1)\n");
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        let has_print_call = main.blocks.iter().flat_map(|b| &b.instructions).any(|i| i.opcode == Opcode::Call && i.label.as_deref() == Some("_builtin_print"));
        assert!(has_print_call);
    }

    #[test]
    fn lambda_lowers_to_its_own_function_and_a_placeholder_in_the_caller() {
        let module = lower_src("var f = func(): return 1\n");
        assert!(module.functions.iter().any(|f| f.name.starts_with("lambda_")));
    }
}
