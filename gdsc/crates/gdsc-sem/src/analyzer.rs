//! The analysis walk itself: scope tracking, type inference, and diagnostics.

use gdsc_par::ast::{self, Expr, Literal, Param, Stmt, UnOp};
use gdsc_util::{Handler, Span, Symbol};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::class::{ClassInfo, ClassTable};
use crate::scope::{ScopeTree, SymbolEntry};
use crate::types::{binary_result_type, is_compatible, BaseKind, TypeInfo};
use crate::FunctionSignature;

/// Everything downstream passes need out of semantic analysis: the
/// class table (`ClassInfo`), the globally visible function signatures
/// (so code generation can resolve a direct call without re-running
/// resolution), and the diagnostics collected along the way.
pub struct AnalysisResult {
    pub classes: ClassTable,
    pub global_functions: FxHashMap<Symbol, FunctionSignature>,
    pub handler: Handler,
}

pub fn analyze(program: &ast::Program) -> AnalysisResult {
    let mut analyzer = Analyzer::new();
    analyzer.analyze_program(program);
    AnalysisResult { classes: analyzer.classes, global_functions: analyzer.global_functions, handler: analyzer.handler }
}

/// Control-flow context threaded explicitly through every walk routine,
/// rather than mutated as implicit analyzer fields.
#[derive(Clone, Default)]
struct Context {
    in_loop: bool,
    expected_return_type: Option<TypeInfo>,
    current_class: Option<Symbol>,
}

impl Context {
    fn with_loop(&self) -> Context {
        Context { in_loop: true, ..self.clone() }
    }

    fn for_callable(return_type: TypeInfo, current_class: Option<Symbol>) -> Context {
        Context { in_loop: false, expected_return_type: Some(return_type), current_class }
    }
}

struct Analyzer {
    scopes: ScopeTree,
    classes: ClassTable,
    global_functions: FxHashMap<Symbol, FunctionSignature>,
    handler: Handler,
}

impl Analyzer {
    fn new() -> Self {
        let mut analyzer = Analyzer {
            scopes: ScopeTree::new(),
            classes: ClassTable::new(),
            global_functions: FxHashMap::default(),
            handler: Handler::new(),
        };
        analyzer.seed_builtins();
        analyzer
    }

    /// Built-in globals: `print` (variadic -> void), `range(int) -> array`,
    /// `len(variant) -> int`, `str(variant) -> string`.
    fn seed_builtins(&mut self) {
        let builtins = [
            ("print", vec![], TypeInfo::void(), true),
            ("range", vec![TypeInfo::int()], TypeInfo::array(), false),
            ("len", vec![TypeInfo::variant()], TypeInfo::int(), false),
            ("str", vec![TypeInfo::variant()], TypeInfo::string(), false),
        ];
        for (name, params, ret, variadic) in builtins {
            let sig = FunctionSignature {
                name: Symbol::intern(name),
                parameter_types: params,
                return_type: ret,
                is_static: false,
                is_variadic: variadic,
                declaration_line: 0,
            };
            self.global_functions.insert(sig.name, sig);
        }
    }

    fn analyze_program(&mut self, program: &ast::Program) {
        debug!(statements = program.statements.len(), "starting semantic analysis");
        let ctx = Context::default();
        // Pass 1 over the top level: register every class/func/var/const
        // signature first so forward references between top-level items
        // resolve, mirroring the two-pass policy applied inside a single
        // class body below.
        for stmt in &program.statements {
            self.register_top_level_signature(stmt);
        }
        for stmt in &program.statements {
            self.analyze_stmt(stmt, &ctx);
        }
    }

    fn register_top_level_signature(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Func(f) => {
                let sig = self.make_function_signature(f);
                self.global_functions.insert(f.name, sig);
            }
            Stmt::Class(c) => self.register_class_signature(c),
            _ => {}
        }
    }

    fn make_function_signature(&mut self, f: &ast::FuncDecl) -> FunctionSignature {
        let parameter_types = f.params.iter().map(|p| self.resolve_type_annotation(p.type_name.as_deref(), p.span)).collect();
        let return_type = match &f.return_type {
            Some(t) => self.resolve_type_annotation(Some(t), f.span),
            None => TypeInfo::void(),
        };
        FunctionSignature {
            name: f.name,
            parameter_types,
            return_type,
            is_static: f.is_static,
            is_variadic: false,
            declaration_line: f.span.line,
        }
    }

    /// Resolves a parsed type annotation's text to a [`TypeInfo`],
    /// reporting an "unknown type" error (spec §4.3/§7) when the
    /// annotation names neither a built-in nor a registered class.
    fn resolve_type_annotation(&mut self, text: Option<&str>, span: Span) -> TypeInfo {
        match text {
            None => TypeInfo::variant(),
            Some(text) => {
                let ty = TypeInfo::from_annotation(text, |name| self.classes.contains(Symbol::intern(name)));
                if ty.base_kind == BaseKind::Unknown {
                    self.handler.error(format!("Unknown type '{}'", text), span);
                }
                ty
            }
        }
    }

    /// Pass 1 for a `class` body: register member variables and method
    /// signatures before any method body is analyzed.
    fn register_class_signature(&mut self, c: &ast::ClassDecl) {
        let Some(name) = c.name else {
            // A degenerate top-level `extends Foo` with no name carries
            // no class to register.
            return;
        };
        let mut info = ClassInfo {
            name,
            base_class_name: c.base_class_name,
            members: FxHashMap::default(),
            methods: FxHashMap::default(),
            signals: Vec::new(),
            declaration_line: c.span.line,
        };
        for member in &c.members {
            match member {
                Stmt::Var(v) => {
                    let ty = self.resolve_type_annotation(v.type_name.as_deref(), v.span);
                    info.members.insert(
                        v.name,
                        SymbolEntry {
                            name: v.name,
                            ty,
                            is_constant: false,
                            is_static: v.is_static,
                            is_initialized: v.init.is_some(),
                            declaration_line: v.span.line,
                        },
                    );
                }
                Stmt::Const(cst) => {
                    let ty = self.resolve_type_annotation(cst.type_name.as_deref(), cst.span);
                    info.members.insert(
                        cst.name,
                        SymbolEntry {
                            name: cst.name,
                            ty,
                            is_constant: true,
                            is_static: true,
                            is_initialized: true,
                            declaration_line: cst.span.line,
                        },
                    );
                }
                Stmt::Func(f) => {
                    let sig = self.make_function_signature(f);
                    info.methods.insert(f.name, sig);
                }
                Stmt::Signal(s) => info.signals.push(s.name),
                _ => {}
            }
        }
        self.classes.insert(info);
    }

    fn analyze_stmt(&mut self, stmt: &Stmt, ctx: &Context) {
        match stmt {
            Stmt::Expr(e) => {
                self.analyze_expr(e, ctx);
            }
            Stmt::Block(b) => self.analyze_block(b, ctx),
            Stmt::If(s) => self.analyze_if(s, ctx),
            Stmt::While(s) => self.analyze_while(s, ctx),
            Stmt::ForIn(s) => self.analyze_for_in(s, ctx),
            Stmt::Match(s) => self.analyze_match(s, ctx),
            Stmt::Return(s) => self.analyze_return(s, ctx),
            Stmt::Break(span) => {
                if !ctx.in_loop {
                    self.handler.error("'break' outside of a loop", *span);
                }
            }
            Stmt::Continue(span) => {
                if !ctx.in_loop {
                    self.handler.error("'continue' outside of a loop", *span);
                }
            }
            Stmt::Pass(_) => {}
            Stmt::Var(v) => self.analyze_var_decl(v, ctx),
            Stmt::Const(c) => self.analyze_const_decl(c, ctx),
            Stmt::Func(f) => self.analyze_func_decl(f, ctx),
            Stmt::Class(c) => self.analyze_class_decl(c, ctx),
            Stmt::Signal(_) => {}
            Stmt::Enum(e) => self.analyze_enum_decl(e, ctx),
        }
    }

    fn analyze_block(&mut self, block: &ast::Block, ctx: &Context) {
        self.scopes.enter_scope();
        for stmt in &block.statements {
            self.analyze_stmt(stmt, ctx);
        }
        self.scopes.exit_scope();
    }

    fn analyze_if(&mut self, s: &ast::IfStmt, ctx: &Context) {
        let cond_ty = self.analyze_expr(&s.cond, ctx);
        self.warn_if_not_boolean(&cond_ty, s.cond.span());
        self.analyze_stmt(&s.then_branch, ctx);
        if let Some(else_branch) = &s.else_branch {
            self.analyze_stmt(else_branch, ctx);
        }
    }

    fn analyze_while(&mut self, s: &ast::WhileStmt, ctx: &Context) {
        let cond_ty = self.analyze_expr(&s.cond, ctx);
        self.warn_if_not_boolean(&cond_ty, s.cond.span());
        let loop_ctx = ctx.with_loop();
        self.analyze_stmt(&s.body, &loop_ctx);
    }

    fn analyze_for_in(&mut self, s: &ast::ForInStmt, ctx: &Context) {
        let iterable_ty = self.analyze_expr(&s.iterable, ctx);
        let iterable_ok =
            matches!(iterable_ty.base_kind, BaseKind::Array | BaseKind::Dict | BaseKind::String | BaseKind::Variant);
        if !iterable_ok {
            self.handler.error(format!("Cannot iterate over a value of type {}", describe_type(&iterable_ty)), s.iterable.span());
        }
        // The loop variable is typed `string` when iterating a string,
        // `variant` otherwise.
        let var_ty = if iterable_ty.base_kind == BaseKind::String { TypeInfo::string() } else { TypeInfo::variant() };

        self.scopes.enter_scope();
        self.scopes.define(SymbolEntry {
            name: s.var_name,
            ty: var_ty,
            is_constant: false,
            is_static: false,
            is_initialized: true,
            declaration_line: s.span.line,
        });
        let loop_ctx = ctx.with_loop();
        self.analyze_stmt(&s.body, &loop_ctx);
        self.scopes.exit_scope();
    }

    fn analyze_match(&mut self, s: &ast::MatchStmt, ctx: &Context) {
        let scrutinee_ty = self.analyze_expr(&s.scrutinee, ctx);
        for case in &s.cases {
            let pattern_ty = self.analyze_expr(&case.pattern, ctx);
            if !pattern_ty.is_variant() && !scrutinee_ty.is_variant() && pattern_ty != scrutinee_ty {
                self.handler.warning(
                    format!(
                        "Pattern type {} may not match expression type {}",
                        describe_type(&pattern_ty),
                        describe_type(&scrutinee_ty)
                    ),
                    case.pattern.span(),
                );
            }
            self.analyze_block(&case.body, ctx);
        }
    }

    fn analyze_return(&mut self, s: &ast::ReturnStmt, ctx: &Context) {
        let actual = match &s.value {
            Some(e) => self.analyze_expr(e, ctx),
            None => TypeInfo::void(),
        };
        if let Some(expected) = &ctx.expected_return_type {
            if !is_compatible(expected, &actual) {
                self.handler.error(
                    format!("Expected return type {} but found {}", describe_type(expected), describe_type(&actual)),
                    s.span,
                );
            }
        }
    }

    fn analyze_var_decl(&mut self, v: &ast::VarDecl, ctx: &Context) {
        let declared = v.type_name.as_deref().map(|t| self.resolve_type_annotation(Some(t), v.span));
        let init_ty = v.init.as_ref().map(|e| self.analyze_expr(e, ctx));
        let ty = match (&declared, &init_ty) {
            (Some(d), _) => d.clone(),
            (None, Some(i)) => i.clone(),
            (None, None) => TypeInfo::variant(),
        };
        if let (Some(declared), Some(init_ty)) = (&declared, &init_ty) {
            if !is_compatible(declared, init_ty) {
                self.handler.error(
                    format!("Cannot assign {} to a variable of type {}", describe_type(init_ty), describe_type(declared)),
                    v.span,
                );
            }
        }
        if !self.scopes.define(SymbolEntry {
            name: v.name,
            ty,
            is_constant: false,
            is_static: v.is_static,
            is_initialized: v.init.is_some(),
            declaration_line: v.span.line,
        }) {
            self.handler.error(format!("'{}' is already defined in this scope", v.name), v.span);
        }
    }

    fn analyze_const_decl(&mut self, c: &ast::ConstDecl, ctx: &Context) {
        let init_ty = self.analyze_expr(&c.init, ctx);
        let ty = match &c.type_name {
            Some(t) => {
                let declared = self.resolve_type_annotation(Some(t), c.span);
                if !is_compatible(&declared, &init_ty) {
                    self.handler.error(
                        format!("Cannot assign {} to a constant of type {}", describe_type(&init_ty), describe_type(&declared)),
                        c.span,
                    );
                }
                declared
            }
            None => init_ty,
        };
        if !self.scopes.define(SymbolEntry {
            name: c.name,
            ty,
            is_constant: true,
            is_static: true,
            is_initialized: true,
            declaration_line: c.span.line,
        }) {
            self.handler.error(format!("'{}' is already defined in this scope", c.name), c.span);
        }
    }

    fn analyze_func_decl(&mut self, f: &ast::FuncDecl, ctx: &Context) {
        let sig = self.make_function_signature(f);
        self.scopes.enter_scope();
        for (param, param_ty) in f.params.iter().zip(sig.parameter_types.iter()) {
            self.bind_param(param, param_ty.clone());
        }
        let func_ctx = Context::for_callable(sig.return_type.clone(), ctx.current_class);
        for stmt in &f.body.statements {
            self.analyze_stmt(stmt, &func_ctx);
        }
        self.scopes.exit_scope();
    }

    fn bind_param(&mut self, param: &Param, ty: TypeInfo) {
        if let Some(default) = &param.default {
            let default_ty = self.analyze_expr(default, &Context::default());
            if !is_compatible(&ty, &default_ty) {
                self.handler.error(
                    format!(
                        "Default value of type {} is not compatible with parameter type {}",
                        describe_type(&default_ty),
                        describe_type(&ty)
                    ),
                    param.span,
                );
            }
        }
        self.scopes.define(SymbolEntry {
            name: param.name,
            ty,
            is_constant: false,
            is_static: false,
            is_initialized: true,
            declaration_line: param.span.line,
        });
    }

    /// Two-pass class body analysis: signatures were
    /// already registered by `register_class_signature` before any
    /// statement in the enclosing scope was analyzed, so method bodies
    /// here can freely reference sibling methods declared later in the
    /// same class.
    fn analyze_class_decl(&mut self, c: &ast::ClassDecl, ctx: &Context) {
        let Some(name) = c.name else { return };
        self.scopes.enter_scope();
        // Pass 1 already populated `self.classes[name].methods`; make
        // every sibling method resolvable as a call target before
        // walking any method body, so `func a(): return b()` resolves
        // even though `b` is declared later in the same class.
        if let Some(info) = self.classes.get(name) {
            let methods: Vec<_> = info.methods.values().cloned().collect();
            for sig in methods {
                self.scopes.define_function(sig.name, sig);
            }
        }
        let class_ctx = Context { current_class: Some(name), ..ctx.clone() };
        for member in &c.members {
            match member {
                Stmt::Var(v) => self.analyze_var_decl(v, &class_ctx),
                Stmt::Const(cst) => self.analyze_const_decl(cst, &class_ctx),
                Stmt::Func(f) => self.analyze_func_decl(f, &class_ctx),
                Stmt::Signal(_) => {}
                Stmt::Enum(e) => self.analyze_enum_decl(e, &class_ctx),
                other => self.handler.error("Non-declaration statement is not allowed directly inside a class body", other.span()),
            }
        }
        self.scopes.exit_scope();
    }

    fn analyze_enum_decl(&mut self, e: &ast::EnumDecl, ctx: &Context) {
        for (variant_name, value) in &e.variants {
            if let Some(value) = value {
                self.analyze_expr(value, ctx);
            }
            self.scopes.define(SymbolEntry {
                name: *variant_name,
                ty: TypeInfo::int(),
                is_constant: true,
                is_static: true,
                is_initialized: true,
                declaration_line: e.span.line,
            });
        }
    }

    fn warn_if_not_boolean(&mut self, ty: &TypeInfo, span: Span) {
        if ty.base_kind != BaseKind::Bool && !ty.is_variant() {
            self.handler.warning(format!("Condition has non-boolean type {}", describe_type(ty)), span);
        }
    }

    fn analyze_expr(&mut self, expr: &Expr, ctx: &Context) -> TypeInfo {
        match expr {
            Expr::Literal(lit, _) => type_of_literal(lit),
            Expr::Ident(name, span) => self.analyze_ident(*name, *span),
            Expr::Binary(b) => self.analyze_binary(b, ctx),
            Expr::Unary(u) => self.analyze_unary(u, ctx),
            Expr::Ternary(t) => self.analyze_ternary(t, ctx),
            Expr::Assign(a) => self.analyze_assign(a, ctx),
            Expr::Call(c) => self.analyze_call(c, ctx),
            Expr::Member(m) => {
                self.analyze_expr(&m.object, ctx);
                TypeInfo::variant()
            }
            Expr::Index(i) => self.analyze_index(i, ctx),
            Expr::ArrayLiteral(a) => {
                for elem in &a.elements {
                    self.analyze_expr(elem, ctx);
                }
                TypeInfo::array()
            }
            Expr::DictLiteral(d) => {
                for (k, v) in &d.entries {
                    self.analyze_expr(k, ctx);
                    self.analyze_expr(v, ctx);
                }
                TypeInfo::dict()
            }
            Expr::Lambda(l) => self.analyze_lambda(l, ctx),
        }
    }

    fn analyze_ident(&mut self, name: Symbol, span: Span) -> TypeInfo {
        if let Some(entry) = self.scopes.resolve(name) {
            if !entry.is_initialized {
                self.handler.warning(format!("'{}' is used before being initialized", name), span);
            }
            return entry.ty.clone();
        }
        if self.global_functions.contains_key(&name) {
            return TypeInfo::simple(BaseKind::Lambda);
        }
        self.handler.error(format!("Undefined variable '{}'", name), span);
        TypeInfo::unknown()
    }

    fn analyze_binary(&mut self, b: &ast::BinaryExpr, ctx: &Context) -> TypeInfo {
        let left = self.analyze_expr(&b.left, ctx);
        let right = self.analyze_expr(&b.right, ctx);
        binary_result_type(b.op, &left, &right)
    }

    fn analyze_unary(&mut self, u: &ast::UnaryExpr, ctx: &Context) -> TypeInfo {
        let operand = self.analyze_expr(&u.operand, ctx);
        match u.op {
            UnOp::Not => TypeInfo::bool(),
            UnOp::Neg | UnOp::Plus => operand,
        }
    }

    fn analyze_ternary(&mut self, t: &ast::TernaryExpr, ctx: &Context) -> TypeInfo {
        let true_ty = self.analyze_expr(&t.true_expr, ctx);
        let cond_ty = self.analyze_expr(&t.cond, ctx);
        let false_ty = self.analyze_expr(&t.false_expr, ctx);
        self.warn_if_not_boolean(&cond_ty, t.cond.span());
        if !true_ty.is_variant() && !false_ty.is_variant() && true_ty != false_ty {
            self.handler.warning(
                format!("Ternary branches have different types: {} and {}", describe_type(&true_ty), describe_type(&false_ty)),
                t.span,
            );
        }
        if true_ty.is_variant() || false_ty.is_variant() {
            TypeInfo::variant()
        } else {
            true_ty
        }
    }

    fn analyze_assign(&mut self, a: &ast::AssignExpr, ctx: &Context) -> TypeInfo {
        let value_ty = self.analyze_expr(&a.value, ctx);
        // `:=` (and `=`) with a non-identifier target is left as-is — no
        // special-cased error, the target is just analyzed like any other
        // expression.
        if let Expr::Ident(name, span) = a.target.as_ref() {
            if matches!(a.op, ast::AssignOp::Walrus) {
                self.scopes.define(SymbolEntry {
                    name: *name,
                    ty: value_ty.clone(),
                    is_constant: false,
                    is_static: false,
                    is_initialized: true,
                    declaration_line: span.line,
                });
            } else if let Some(entry) = self.scopes.resolve(*name) {
                if entry.is_constant {
                    self.handler.error(format!("Cannot assign to constant '{}'", name), *span);
                }
                let target_ty = entry.ty.clone();
                if !is_compatible(&target_ty, &value_ty) {
                    self.handler.error(
                        format!("Cannot assign {} to '{}' of type {}", describe_type(&value_ty), name, describe_type(&target_ty)),
                        *span,
                    );
                }
                if let Some(entry) = self.scopes.resolve_mut(*name) {
                    entry.is_initialized = true;
                }
            } else {
                self.handler.error(format!("Undefined variable '{}'", name), *span);
            }
        } else {
            self.analyze_expr(&a.target, ctx);
        }
        value_ty
    }

    fn analyze_call(&mut self, c: &ast::CallExpr, ctx: &Context) -> TypeInfo {
        for arg in &c.args {
            self.analyze_expr(arg, ctx);
        }
        let Expr::Ident(name, span) = c.callee.as_ref() else {
            self.analyze_expr(&c.callee, ctx);
            return TypeInfo::variant();
        };
        let sig = self.scopes.resolve_function(*name).cloned().or_else(|| self.global_functions.get(name).cloned());
        match sig {
            Some(sig) => {
                if !sig.is_variadic && c.args.len() != sig.parameter_types.len() {
                    self.handler.error(
                        format!("'{}' expects {} argument(s) but {} were given", name, sig.parameter_types.len(), c.args.len()),
                        *span,
                    );
                }
                sig.return_type.clone()
            }
            None => {
                self.handler.error(format!("Undefined variable '{}'", name), *span);
                TypeInfo::unknown()
            }
        }
    }

    fn analyze_index(&mut self, i: &ast::IndexExpr, ctx: &Context) -> TypeInfo {
        let object_ty = self.analyze_expr(&i.object, ctx);
        self.analyze_expr(&i.index, ctx);
        let indexable = matches!(object_ty.base_kind, BaseKind::Array | BaseKind::Dict | BaseKind::String | BaseKind::Variant);
        if !indexable {
            self.handler.error(format!("Cannot index a value of type {}", describe_type(&object_ty)), i.span);
        }
        TypeInfo::variant()
    }

    fn analyze_lambda(&mut self, l: &ast::LambdaExpr, ctx: &Context) -> TypeInfo {
        let return_type = self.resolve_type_annotation(l.return_type.as_deref(), l.span);
        self.scopes.enter_scope();
        for param in &l.params {
            let ty = self.resolve_type_annotation(param.type_name.as_deref(), param.span);
            self.bind_param(param, ty);
        }
        let lambda_ctx = Context::for_callable(return_type, ctx.current_class);
        for stmt in &l.body.statements {
            self.analyze_stmt(stmt, &lambda_ctx);
        }
        self.scopes.exit_scope();
        TypeInfo::simple(BaseKind::Lambda)
    }
}

fn type_of_literal(lit: &Literal) -> TypeInfo {
    match lit {
        Literal::Int(_) => TypeInfo::int(),
        Literal::Float(_) => TypeInfo::float(),
        Literal::Str(_) => TypeInfo::string(),
        Literal::Bool(_) => TypeInfo::bool(),
        Literal::Null => TypeInfo::variant(),
    }
}

fn describe_type(ty: &TypeInfo) -> String {
    match ty.custom_name {
        Some(name) => name.to_string(),
        None => format!("{:?}", ty.base_kind).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_lex::tokenize;
    use gdsc_par::parse;

    fn analyze_src(src: &str) -> AnalysisResult {
        let (tokens, lh) = tokenize(src);
        assert!(!lh.has_errors());
        let (program, ph) = parse(&tokens);
        assert!(!ph.has_errors(), "{:?}", ph.diagnostics());
        analyze(&program)
    }

    #[test]
    fn walrus_assignment_infers_int() {
        let result = analyze_src("a := 1 + 2\n");
        assert!(!result.handler.has_errors(), "{:?}", result.handler.diagnostics());
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let result = analyze_src("print(q)\n");
        assert!(result.handler.has_errors());
        assert!(result.handler.diagnostics()[0].message.contains("Undefined variable 'q'"));
    }

    #[test]
    fn class_methods_may_forward_reference_each_other() {
        let result = analyze_src("class C:\n    func a(): return b()\n    func b(): return 1\n");
        assert!(!result.handler.has_errors(), "{:?}", result.handler.diagnostics());
        let c = result.classes.get(Symbol::intern("C")).unwrap();
        assert_eq!(c.methods.len(), 2);
    }

    #[test]
    fn match_pattern_type_mismatch_is_a_warning_not_an_error() {
        let result = analyze_src("match 3:\n    \"x\":\n        pass\n");
        assert!(!result.handler.has_errors());
        assert_eq!(result.handler.warning_count(), 1);
        assert!(result.handler.diagnostics()[0].message.contains("may not match"));
    }

    #[test]
    fn duplicate_definition_in_same_scope_is_an_error() {
        let result = analyze_src("var x = 1\nvar x = 2\n");
        assert!(result.handler.has_errors());
    }

    #[test]
    fn break_outside_loop_is_an_error() {
        let result = analyze_src("break\n");
        assert!(result.handler.has_errors());
    }

    #[test]
    fn for_in_over_string_binds_string_typed_variable() {
        let result = analyze_src("for c in \"abc\":\n    pass\n");
        assert!(!result.handler.has_errors());
    }

    #[test]
    fn argument_count_mismatch_is_an_error() {
        let result = analyze_src("func f(a: int): pass\nf(1, 2)\n");
        assert!(result.handler.has_errors());
    }

    #[test]
    fn unknown_type_annotation_is_an_error() {
        let result = analyze_src("func f(a: NotAType):\n    pass\n");
        assert!(result.handler.has_errors());
        assert!(result.handler.diagnostics()[0].message.contains("Unknown type 'NotAType'"));
    }

    #[test]
    fn plain_statement_inside_class_body_is_an_error() {
        let result = analyze_src("class C:\n    print(1)\n");
        assert!(result.handler.has_errors());
    }
}
