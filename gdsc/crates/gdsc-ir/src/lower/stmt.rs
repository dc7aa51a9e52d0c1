//! Statement lowering.

use tracing::trace;

use gdsc_par::ast::{self, Stmt};

use crate::error::LowerError;
use crate::instruction::{Instruction, Opcode};
use crate::register::RegisterKind;

use super::Lowerer;

impl<'a> Lowerer<'a> {
    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        match stmt {
            Stmt::Expr(e) => {
                self.lower_expr(e)?;
                Ok(())
            }
            Stmt::Block(b) => self.lower_block(b),
            Stmt::If(s) => self.lower_if(s),
            Stmt::While(s) => self.lower_while(s),
            Stmt::ForIn(s) => self.lower_for_in(s),
            Stmt::Match(s) => self.lower_match(s),
            Stmt::Return(s) => self.lower_return(s),
            Stmt::Break(_) => {
                let label = self.break_labels.last().cloned().ok_or(LowerError::OrphanBreak)?;
                self.emit(Instruction::jump(Opcode::Jmp, label));
                Ok(())
            }
            Stmt::Continue(_) => {
                let label = self.continue_labels.last().cloned().ok_or(LowerError::OrphanContinue)?;
                self.emit(Instruction::jump(Opcode::Jmp, label));
                Ok(())
            }
            Stmt::Pass(_) => {
                self.emit(Instruction::nop());
                Ok(())
            }
            Stmt::Var(d) => self.lower_var_decl(d),
            Stmt::Const(d) => self.lower_const_decl(d),
            // Nested function/class declarations have no top-level-only
            // lowering rule in this language; they are registered by the
            // analyzer but carry no runtime effect here.
            Stmt::Func(_) | Stmt::Class(_) | Stmt::Signal(_) | Stmt::Enum(_) => {
                trace!("skipping nested declaration with no statement-level lowering");
                Ok(())
            }
        }
    }

    fn lower_block(&mut self, block: &ast::Block) -> Result<(), LowerError> {
        for stmt in &block.statements {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_var_decl(&mut self, decl: &ast::VarDecl) -> Result<(), LowerError> {
        let reg = self.mint_register(RegisterKind::General, decl.name.as_str());
        match &decl.init {
            Some(init) => {
                let value = self.lower_expr(init)?;
                self.emit(Instruction::new(Opcode::Mov, vec![reg.clone(), value]));
            }
            None => self.emit(Instruction::with_immediate(Opcode::Mov, vec![reg.clone()], 0)),
        }
        self.define_var(decl.name, reg);
        Ok(())
    }

    fn lower_const_decl(&mut self, decl: &ast::ConstDecl) -> Result<(), LowerError> {
        let reg = self.mint_register(RegisterKind::General, decl.name.as_str());
        let value = self.lower_expr(&decl.init)?;
        self.emit(Instruction::new(Opcode::Mov, vec![reg.clone(), value]));
        self.define_var(decl.name, reg);
        Ok(())
    }

    fn lower_if(&mut self, stmt: &ast::IfStmt) -> Result<(), LowerError> {
        let cond = self.lower_expr(&stmt.cond)?;
        let else_label = self.next_label("else");
        let end_label = self.next_label("endif");
        self.emit(Instruction::with_immediate(Opcode::Cmp, vec![cond], 0));
        self.emit(Instruction::jump(Opcode::Je, else_label.clone()));
        self.lower_stmt(&stmt.then_branch)?;
        self.emit(Instruction::jump(Opcode::Jmp, end_label.clone()));
        self.enter_block(else_label);
        if let Some(else_branch) = &stmt.else_branch {
            self.lower_stmt(else_branch)?;
        }
        self.enter_block(end_label);
        Ok(())
    }

    fn lower_while(&mut self, stmt: &ast::WhileStmt) -> Result<(), LowerError> {
        let loop_label = self.next_label("loop");
        let end_label = self.next_label("endloop");
        self.enter_block(loop_label.clone());
        let cond = self.lower_expr(&stmt.cond)?;
        self.emit(Instruction::with_immediate(Opcode::Cmp, vec![cond], 0));
        self.emit(Instruction::jump(Opcode::Je, end_label.clone()));

        self.break_labels.push(end_label.clone());
        self.continue_labels.push(loop_label.clone());
        let body_result = self.lower_stmt(&stmt.body);
        self.break_labels.pop();
        self.continue_labels.pop();
        body_result?;

        self.emit(Instruction::jump(Opcode::Jmp, loop_label));
        self.enter_block(end_label);
        Ok(())
    }

    /// A simplified loop driven by the runtime iterator protocol: the
    /// check, body, and advance steps each call a fixed runtime symbol
    /// rather than indexing the iterable directly.
    fn lower_for_in(&mut self, stmt: &ast::ForInStmt) -> Result<(), LowerError> {
        let iterable = self.lower_expr(&stmt.iterable)?;
        let loop_label = self.next_label("forloop");
        let end_label = self.next_label("endfor");

        self.enter_block(loop_label.clone());
        let valid = self.call_direct("_iterator_valid", vec![iterable.clone()]);
        self.emit(Instruction::with_immediate(Opcode::Cmp, vec![valid], 0));
        self.emit(Instruction::jump(Opcode::Je, end_label.clone()));

        let item = self.call_direct("_iterator_get", vec![iterable.clone()]);
        self.enter_scope();
        self.define_var(stmt.var_name, item);

        self.break_labels.push(end_label.clone());
        self.continue_labels.push(loop_label.clone());
        let body_result = self.lower_stmt(&stmt.body);
        self.break_labels.pop();
        self.continue_labels.pop();
        self.exit_scope();
        body_result?;

        self.call_direct("_iterator_next", vec![iterable]);
        self.emit(Instruction::jump(Opcode::Jmp, loop_label));
        self.enter_block(end_label);
        Ok(())
    }

    fn lower_match(&mut self, stmt: &ast::MatchStmt) -> Result<(), LowerError> {
        let scrutinee = self.lower_expr(&stmt.scrutinee)?;
        let end_label = self.next_label("endmatch");
        let mut case_labels = Vec::with_capacity(stmt.cases.len());
        for _ in &stmt.cases {
            case_labels.push(self.next_label("case"));
        }

        for (case, case_label) in stmt.cases.iter().zip(&case_labels) {
            let pattern = self.lower_expr(&case.pattern)?;
            self.emit(Instruction::new(Opcode::Cmp, vec![scrutinee.clone(), pattern]));
            self.emit(Instruction::jump(Opcode::Je, case_label.clone()));
        }
        self.emit(Instruction::jump(Opcode::Jmp, end_label.clone()));

        for (case, case_label) in stmt.cases.iter().zip(case_labels) {
            self.enter_block(case_label);
            for case_stmt in &case.body.statements {
                self.lower_stmt(case_stmt)?;
            }
            self.emit(Instruction::jump(Opcode::Jmp, end_label.clone()));
        }
        self.enter_block(end_label);
        Ok(())
    }

    fn lower_return(&mut self, stmt: &ast::ReturnStmt) -> Result<(), LowerError> {
        match &stmt.value {
            Some(value) => {
                let reg = self.lower_expr(value)?;
                self.current.return_register = Some(reg.clone());
                self.emit(Instruction::new(Opcode::Ret, vec![reg]));
            }
            None => self.emit(Instruction::new(Opcode::Ret, vec![])),
        }
        Ok(())
    }
}
