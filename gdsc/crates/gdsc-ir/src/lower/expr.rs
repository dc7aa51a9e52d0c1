//! Expression lowering. Every lowering returns the [`Register`] holding
//! the expression's value.

use tracing::trace;

use gdsc_par::ast::{AssignOp, BinOp, Expr, Literal, UnOp};

use crate::error::LowerError;
use crate::instruction::{Instruction, Opcode};
use crate::register::{Register, RegisterKind};

use super::Lowerer;

impl<'a> Lowerer<'a> {
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> Result<Register, LowerError> {
        match expr {
            Expr::Literal(lit, _) => Ok(self.lower_literal(lit)),
            Expr::Ident(name, _) => Ok(self.lower_ident(*name)),
            Expr::Binary(e) => self.lower_binary(e),
            Expr::Unary(e) => self.lower_unary(e),
            Expr::Ternary(e) => self.lower_ternary(e),
            Expr::Assign(e) => self.lower_assign(e),
            Expr::Call(e) => self.lower_call(e),
            Expr::Member(e) => self.lower_member(e),
            Expr::Index(e) => self.lower_index(e),
            Expr::ArrayLiteral(e) => self.lower_array_literal(e),
            Expr::DictLiteral(e) => self.lower_dict_literal(e),
            Expr::Lambda(e) => self.lower_lambda(e),
        }
    }

    fn lower_literal(&mut self, lit: &Literal) -> Register {
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        let value = match lit {
            Literal::Int(v) => *v,
            // placeholder: the IR has no floating-point immediate encoding,
            // so a float literal is scaled into an integer representation.
            Literal::Float(v) => (v * 1000.0) as i64,
            Literal::Bool(b) => *b as i64,
            // placeholder: string literals have no constant pool at this
            // level; their byte length stands in for the value.
            Literal::Str(s) => s.len() as i64,
            Literal::Null => 0,
        };
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], value));
        dest
    }

    fn lower_ident(&mut self, name: gdsc_util::Symbol) -> Register {
        if let Some(reg) = self.resolve_var(name) {
            return reg;
        }
        trace!(name = %name, "identifier has no bound register at lowering time, defaulting to zero");
        let dest = self.mint_register(RegisterKind::General, name.as_str());
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 0));
        dest
    }

    fn lower_binary(&mut self, e: &gdsc_par::ast::BinaryExpr) -> Result<Register, LowerError> {
        match e.op {
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                self.lower_comparison(e.op, &e.left, &e.right)
            }
            BinOp::In => {
                let left = self.lower_expr(&e.left)?;
                let right = self.lower_expr(&e.right)?;
                Ok(self.call_direct("_contains", vec![left, right]))
            }
            _ => {
                let left = self.lower_expr(&e.left)?;
                let right = self.lower_expr(&e.right)?;
                let opcode = match e.op {
                    BinOp::Add => Opcode::Add,
                    BinOp::Sub => Opcode::Sub,
                    BinOp::Mul => Opcode::Mul,
                    BinOp::Div => Opcode::Div,
                    BinOp::Mod => Opcode::Mod,
                    BinOp::And => Opcode::And,
                    BinOp::Or => Opcode::Or,
                    _ => unreachable!("comparison and `in` are handled above"),
                };
                let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
                self.emit(Instruction::new(opcode, vec![dest.clone(), left, right]));
                Ok(dest)
            }
        }
    }

    /// No `SETcc`-style opcode exists, so a comparison used as a value
    /// lowers the same way an `if` condition does: branch to one of two
    /// `MOV`s of a boolean immediate, then join.
    fn lower_comparison(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Result<Register, LowerError> {
        let left_reg = self.lower_expr(left)?;
        let right_reg = self.lower_expr(right)?;
        let jump_opcode = match op {
            BinOp::Eq => Opcode::Je,
            BinOp::NotEq => Opcode::Jne,
            BinOp::Lt => Opcode::Jl,
            BinOp::Le => Opcode::Jle,
            BinOp::Gt => Opcode::Jg,
            BinOp::Ge => Opcode::Jge,
            _ => unreachable!("only comparison operators reach this branch"),
        };

        let true_label = self.next_label("cmp_true");
        let end_label = self.next_label("cmp_end");
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());

        self.emit(Instruction::new(Opcode::Cmp, vec![left_reg, right_reg]));
        self.emit(Instruction::jump(jump_opcode, true_label.clone()));
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 0));
        self.emit(Instruction::jump(Opcode::Jmp, end_label.clone()));
        self.enter_block(true_label);
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 1));
        self.enter_block(end_label);
        Ok(dest)
    }

    fn lower_unary(&mut self, e: &gdsc_par::ast::UnaryExpr) -> Result<Register, LowerError> {
        let operand = self.lower_expr(&e.operand)?;
        match e.op {
            UnOp::Plus => Ok(operand),
            UnOp::Neg => {
                let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
                self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 0));
                self.emit(Instruction::new(Opcode::Sub, vec![dest.clone(), dest.clone(), operand]));
                Ok(dest)
            }
            UnOp::Not => {
                let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
                self.emit(Instruction::with_immediate(Opcode::Xor, vec![dest.clone(), operand], 1));
                Ok(dest)
            }
        }
    }

    fn lower_ternary(&mut self, e: &gdsc_par::ast::TernaryExpr) -> Result<Register, LowerError> {
        let cond = self.lower_expr(&e.cond)?;
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        let else_label = self.next_label("tern_else");
        let end_label = self.next_label("tern_end");

        self.emit(Instruction::with_immediate(Opcode::Cmp, vec![cond], 0));
        self.emit(Instruction::jump(Opcode::Je, else_label.clone()));
        let true_value = self.lower_expr(&e.true_expr)?;
        self.emit(Instruction::new(Opcode::Mov, vec![dest.clone(), true_value]));
        self.emit(Instruction::jump(Opcode::Jmp, end_label.clone()));
        self.enter_block(else_label);
        let false_value = self.lower_expr(&e.false_expr)?;
        self.emit(Instruction::new(Opcode::Mov, vec![dest.clone(), false_value]));
        self.enter_block(end_label);
        Ok(dest)
    }

    fn lower_assign(&mut self, e: &gdsc_par::ast::AssignExpr) -> Result<Register, LowerError> {
        let value = self.lower_expr(&e.value)?;

        match (&e.op, e.target.as_ref()) {
            (AssignOp::Walrus, Expr::Ident(name, _)) => {
                let dest = self.mint_register(RegisterKind::General, name.as_str());
                self.emit(Instruction::new(Opcode::Mov, vec![dest.clone(), value]));
                self.define_var(*name, dest.clone());
                Ok(dest)
            }
            (AssignOp::Assign, Expr::Ident(name, _)) => {
                let dest = self.resolve_var(*name).unwrap_or_else(|| self.mint_register(RegisterKind::General, name.as_str()));
                self.emit(Instruction::new(Opcode::Mov, vec![dest.clone(), value]));
                self.define_var(*name, dest.clone());
                Ok(dest)
            }
            (op, Expr::Ident(name, _)) => {
                let dest = self.resolve_var(*name).unwrap_or_else(|| self.mint_register(RegisterKind::General, name.as_str()));
                let opcode = compound_opcode(*op);
                self.emit(Instruction::new(opcode, vec![dest.clone(), dest.clone(), value]));
                self.define_var(*name, dest.clone());
                Ok(dest)
            }
            (_, Expr::Member(member)) => {
                let object = self.lower_expr(&member.object)?;
                self.emit(Instruction { opcode: Opcode::Store, operands: vec![object, value.clone()], label: Some(member.name.to_string()), immediate: 0, has_immediate: false });
                Ok(value)
            }
            (_, Expr::Index(index)) => {
                let object = self.lower_expr(&index.object)?;
                let index_reg = self.lower_expr(&index.index)?;
                self.emit(Instruction::new(Opcode::Store, vec![object, index_reg, value.clone()]));
                Ok(value)
            }
            _ => {
                // `:=` onto a non-identifier, non-lvalue target parses but
                // has nothing to store into; the value still evaluates for
                // its side effects.
                Ok(value)
            }
        }
    }

    fn lower_member(&mut self, e: &gdsc_par::ast::MemberExpr) -> Result<Register, LowerError> {
        let object = self.lower_expr(&e.object)?;
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction { opcode: Opcode::Load, operands: vec![dest.clone(), object], label: Some(e.name.to_string()), immediate: 0, has_immediate: false });
        Ok(dest)
    }

    fn lower_index(&mut self, e: &gdsc_par::ast::IndexExpr) -> Result<Register, LowerError> {
        let object = self.lower_expr(&e.object)?;
        let index = self.lower_expr(&e.index)?;
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction::new(Opcode::Load, vec![dest.clone(), object, index]));
        Ok(dest)
    }

    /// placeholder: the IR has no container representation, so elements
    /// are lowered only for their side effects and the literal itself
    /// resolves to a zeroed register.
    fn lower_array_literal(&mut self, e: &gdsc_par::ast::ArrayLiteralExpr) -> Result<Register, LowerError> {
        for element in &e.elements {
            self.lower_expr(element)?;
        }
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 0));
        Ok(dest)
    }

    fn lower_dict_literal(&mut self, e: &gdsc_par::ast::DictLiteralExpr) -> Result<Register, LowerError> {
        for (key, value) in &e.entries {
            self.lower_expr(key)?;
            self.lower_expr(value)?;
        }
        let dest = self.mint_register(RegisterKind::General, &self.next_temp_name());
        self.emit(Instruction::with_immediate(Opcode::Mov, vec![dest.clone()], 0));
        Ok(dest)
    }
}

fn compound_opcode(op: AssignOp) -> Opcode {
    match op {
        AssignOp::AddAssign => Opcode::Add,
        AssignOp::SubAssign => Opcode::Sub,
        AssignOp::MulAssign => Opcode::Mul,
        AssignOp::DivAssign => Opcode::Div,
        AssignOp::ModAssign => Opcode::Mod,
        AssignOp::Assign | AssignOp::Walrus => unreachable!("handled by the identifier arms above"),
    }
}
