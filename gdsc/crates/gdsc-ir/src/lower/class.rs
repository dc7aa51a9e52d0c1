//! Class, lambda, and call lowering — the three places a fresh
//! [`crate::Function`] gets spliced into the module outside of a
//! top-level `func`.

use tracing::{debug, trace};

use gdsc_par::ast::{self, Expr};
use gdsc_util::Symbol;

use crate::error::LowerError;
use crate::function::Function;
use crate::instruction::{Instruction, Opcode};
use crate::register::{Register, RegisterKind};

use super::Lowerer;

/// Reserved names the codegen's runtime provides directly, bypassing
/// user/class function resolution.
const BUILTINS: [&str; 6] = ["print", "len", "range", "str", "int", "float"];

impl<'a> Lowerer<'a> {
    pub(crate) fn lower_class(&mut self, class: &ast::ClassDecl) -> Result<(), LowerError> {
        let class_name = class.name.expect("degenerate class_name forms are filtered out before lowering");
        debug!(class = %class_name, "lowering class to IR");

        if let Some(info) = self.analysis.classes.get(class_name) {
            if let Some(base) = info.base_class_name {
                trace!(base = %base, "class has a base class; inheritance is not modeled by this lowering");
            }
        }

        let previous_class = self.current_class.replace(class_name);
        let previous_members = std::mem::take(&mut self.class_members);

        for member in &class.members {
            if let ast::Stmt::Var(decl) = member {
                let reg = self.mint_register(RegisterKind::General, &format!("{}_{}", class_name, decl.name));
                self.class_members.insert(decl.name, reg);
            }
        }

        for member in &class.members {
            if let ast::Stmt::Func(method) = member {
                self.lower_method(class_name, method)?;
            }
        }

        self.class_members = previous_members;
        self.current_class = previous_class;
        Ok(())
    }

    fn lower_method(&mut self, class_name: Symbol, method: &ast::FuncDecl) -> Result<(), LowerError> {
        let mangled = format!("{}_{}", class_name, method.name);
        let mut param_names = Vec::with_capacity(method.params.len() + 1);
        if !method.is_static {
            param_names.push(Symbol::intern("self"));
        }
        param_names.extend(method.params.iter().map(|p| p.name));

        self.begin_function(&mangled, &param_names);
        for (member_name, member_reg) in self.class_members.clone() {
            self.define_var(member_name, member_reg);
        }
        for stmt in &method.body.statements {
            self.lower_stmt(stmt)?;
        }
        self.finish_function(method.return_type.is_some());
        Ok(())
    }

    /// Lowers the body as a fresh function, preserving the outer
    /// function/block/variable context across the switch, and leaves a
    /// placeholder value in the surrounding scope standing in for the
    /// not-yet-linked function pointer.
    pub(crate) fn lower_lambda(&mut self, lambda: &ast::LambdaExpr) -> Result<Register, LowerError> {
        let name = format!("lambda_{}", self.functions.len());

        let outer_current = std::mem::replace(&mut self.current, Function::new("__unset__"));
        let outer_scopes = std::mem::take(&mut self.var_scopes);
        let outer_label_counter = self.label_counter;
        let outer_break = std::mem::take(&mut self.break_labels);
        let outer_continue = std::mem::take(&mut self.continue_labels);

        let param_names: Vec<Symbol> = lambda.params.iter().map(|p| p.name).collect();
        self.begin_function(&name, &param_names);
        let lowered = (|| {
            for stmt in &lambda.body.statements {
                self.lower_stmt(stmt)?;
            }
            Ok(())
        })();
        self.finish_function(true);

        self.current = outer_current;
        self.var_scopes = outer_scopes;
        self.label_counter = outer_label_counter;
        self.break_labels = outer_break;
        self.continue_labels = outer_continue;
        lowered?;

        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 0));
        Ok(dest)
    }

    pub(crate) fn lower_call(&mut self, call: &ast::CallExpr) -> Result<Register, LowerError> {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.lower_expr(arg)?);
        }

        match call.callee.as_ref() {
            Expr::Ident(name, _) if BUILTINS.contains(&name.as_str()) => {
                Ok(self.call_direct(&format!("_builtin_{}", name), args))
            }
            Expr::Ident(name, _) => Ok(self.call_direct(name.as_str(), args)),
            Expr::Member(member) => {
                let receiver = self.lower_expr(&member.object)?;
                let mut call_args = Vec::with_capacity(args.len() + 1);
                call_args.push(receiver);
                call_args.extend(args);
                Ok(self.call_direct(member.name.as_str(), call_args))
            }
            other => {
                let target = self.lower_expr(other)?;
                Ok(self.call_indirect(target, args))
            }
        }
    }

    /// `PUSH` each argument in reverse order, `CALL` the mangled target,
    /// then `POP` once per argument to restore the stack.
    pub(crate) fn call_direct(&mut self, mangled_name: &str, args: Vec<Register>) -> Register {
        for arg in args.iter().rev() {
            self.emit(Instruction::new(Opcode::Push, vec![arg.clone()]));
        }
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction { opcode: Opcode::Call, operands: vec![dest.clone()], label: Some(mangled_name.to_string()), immediate: 0, has_immediate: false });
        for _ in &args {
            self.emit(Instruction::new(Opcode::Pop, vec![]));
        }
        dest
    }

    fn call_indirect(&mut self, target: Register, args: Vec<Register>) -> Register {
        for arg in args.iter().rev() {
            self.emit(Instruction::new(Opcode::Push, vec![arg.clone()]));
        }
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction { opcode: Opcode::Call, operands: vec![dest.clone(), target], label: None, immediate: 0, has_immediate: false });
        for _ in &args {
            self.emit(Instruction::new(Opcode::Pop, vec![]));
        }
        dest
    }
}
