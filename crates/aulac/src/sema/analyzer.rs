//! Semantic analyzer - declaration binding, type checking and constant folding
//!
//! A single depth-first pass over the AST. Each violation produces exactly
//! one diagnostic and turns the offending node's type into `None`, which
//! cuts off further propagation from that subtree; traversal always
//! continues into siblings so one run surfaces every independent error.

use std::cmp::Ordering;

use super::scope::SymbolTable;
use crate::ast::*;
use crate::common::{Diagnostic, ErrorCollection, Span};

/// Semantic analyzer for one program.
///
/// Holds a fresh symbol table per run; diagnostics are threaded in from
/// the caller so the collection can span all front-end phases.
pub struct SemanticAnalyzer<'e> {
    table: SymbolTable,
    errors: &'e mut ErrorCollection,
}

impl<'e> SemanticAnalyzer<'e> {
    pub fn new(errors: &'e mut ErrorCollection) -> Self {
        Self {
            table: SymbolTable::new(),
            errors,
        }
    }

    /// Analyze a program, filling in the inferred types and folded values
    /// of its nodes.
    ///
    /// Returns true iff no semantic diagnostic was recorded. Each call
    /// starts from a fresh symbol table and a cleared semantic sequence;
    /// earlier-phase diagnostics are left alone.
    pub fn analyze(&mut self, program: &mut Program) -> bool {
        self.errors.clear_semantic();
        self.table = SymbolTable::new();

        for stmt in &mut program.statements {
            self.visit_stmt(stmt);
        }

        !self.errors.has_semantic_errors()
    }

    /// The bindings resolved by the last run
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    /// Consume the analyzer, keeping the symbol table snapshot
    pub fn into_symbol_table(self) -> SymbolTable {
        self.table
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        match &mut stmt.kind {
            StmtKind::Declaration(decl) => self.visit_declaration(decl),
            StmtKind::Assignment(assign) => self.visit_assignment(assign),

            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.visit_expr(condition);
                self.check_condition(condition, "si");

                self.table.enter_scope();
                self.visit_block(then_body);
                self.table.exit_scope();

                if let Some(else_body) = else_body {
                    self.table.enter_scope();
                    self.visit_block(else_body);
                    self.table.exit_scope();
                }
            }

            StmtKind::While { condition, body } => {
                self.visit_expr(condition);
                self.check_condition(condition, "mientras");

                self.table.enter_scope();
                self.visit_block(body);
                self.table.exit_scope();
            }

            StmtKind::Repeat { count, body } => {
                self.visit_expr(count);
                if let Some(ty) = count.ty {
                    if ty != Type::Int {
                        self.errors.add(Diagnostic::type_mismatch(
                            Type::Int,
                            ty,
                            "repetition count must be integer",
                            count.span,
                        ));
                    }
                }

                self.table.enter_scope();
                self.visit_block(body);
                self.table.exit_scope();
            }

            // Anything can be printed
            StmtKind::Print(expr) => self.visit_expr(expr),

            StmtKind::Input(var) => {
                let Some(symbol) = self.table.lookup(&var.name) else {
                    self.errors.add(Diagnostic::undeclared(&var.name, var.span));
                    return;
                };
                var.ty = Some(symbol.ty);
                // The value is runtime-supplied; any recorded constant is stale
                self.table.set_value(&var.name, None);
            }
        }
    }

    /// The declared type flows from the type keyword down through the
    /// identifier list to each identifier (inherited attribute).
    fn visit_declaration(&mut self, decl: &mut Declaration) {
        let declared = decl.declared_type;
        decl.list.ty = Some(declared);

        for ident in &mut decl.list.idents {
            // Duplicate check is against the current scope only, which
            // also catches repeats within this same list
            if self.table.insert(&ident.name, declared, None, ident.span) {
                ident.ty = Some(declared);
            } else {
                self.errors
                    .add(Diagnostic::redeclaration(&ident.name, ident.span));
            }
        }
    }

    fn visit_assignment(&mut self, assign: &mut Assignment) {
        // Bottom-up: the expression's type is needed first
        self.visit_expr(&mut assign.value);

        let Some(symbol) = self.table.lookup(&assign.target.name) else {
            self.errors
                .add(Diagnostic::undeclared(&assign.target.name, assign.target.span));
            return;
        };
        let declared = symbol.ty;
        assign.target.ty = Some(declared);

        // A typeless expression was already reported downstream
        let Some(found) = assign.value.ty else {
            return;
        };

        if !declared.accepts(found) {
            self.errors.add(Diagnostic::type_mismatch(
                declared,
                found,
                format!("incompatible types in assignment: '{declared}' and '{found}'"),
                assign.span,
            ));
            return;
        }

        // The assignment's own type is the symbol's declared type
        assign.ty = Some(declared);

        if assign.value.value.is_some() {
            self.table
                .set_value(&assign.target.name, assign.value.value.clone());
        }
    }

    fn visit_block(&mut self, block: &mut Block) {
        // Scope entry/exit belongs to the owning construct
        for stmt in &mut block.statements {
            self.visit_stmt(stmt);
        }
    }

    fn check_condition(&mut self, condition: &Expr, construct: &str) {
        // A typeless condition already produced a diagnostic; do not cascade
        if let Some(ty) = condition.ty {
            if ty != Type::Bool {
                self.errors.add(Diagnostic::type_mismatch(
                    Type::Bool,
                    ty,
                    format!("condition of '{construct}' must be boolean"),
                    condition.span,
                ));
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::IntLiteral(v) => {
                expr.ty = Some(Type::Int);
                expr.value = Some(Value::Int(*v));
            }

            ExprKind::FloatLiteral(v) => {
                expr.ty = Some(Type::Float);
                expr.value = Some(Value::Float(*v));
            }

            ExprKind::StringLiteral(v) => {
                expr.ty = Some(Type::Str);
                expr.value = Some(Value::Str(v.clone()));
            }

            ExprKind::Variable(name) => match self.table.lookup(name) {
                Some(symbol) => {
                    expr.ty = Some(symbol.ty);
                    expr.value = symbol.value.clone();
                }
                None => {
                    self.errors.add(Diagnostic::undeclared(name, expr.span));
                    expr.ty = None;
                }
            },

            ExprKind::Binary { op, left, right } => {
                let op = *op;
                self.visit_expr(left);
                self.visit_expr(right);

                let (ty, value) = self.check_binary(op, left, right, expr.span);
                expr.ty = ty;
                expr.value = value;
            }

            ExprKind::Unary { op, operand } => {
                let op = *op;
                self.visit_expr(operand);

                let (ty, value) = self.check_unary(op, operand, expr.span);
                expr.ty = ty;
                expr.value = value;
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> (Option<Type>, Option<Value>) {
        // An operand without a type already failed; stay silent
        let (Some(lt), Some(rt)) = (left.ty, right.ty) else {
            return (None, None);
        };

        let ty = if op.is_arithmetic() {
            if lt == Type::Int && rt == Type::Int {
                Some(Type::Int)
            } else if lt.is_numeric() && rt.is_numeric() {
                Some(Type::Float)
            } else if op == BinOp::Add && lt == Type::Str && rt == Type::Str {
                // Concatenation is the only string operator
                Some(Type::Str)
            } else {
                self.errors.add(Diagnostic::type_mismatch(
                    "compatible numeric types",
                    format!("{lt} and {rt}"),
                    format!("operator '{op}' cannot be applied to types '{lt}' and '{rt}'"),
                    span,
                ));
                None
            }
        } else if op.is_relational() {
            if (lt.is_numeric() && rt.is_numeric()) || lt == rt {
                Some(Type::Bool)
            } else {
                self.errors.add(Diagnostic::type_mismatch(
                    "compatible types",
                    format!("{lt} and {rt}"),
                    format!("operator '{op}' cannot be applied to types '{lt}' and '{rt}'"),
                    span,
                ));
                None
            }
        } else {
            // Logical
            if lt == Type::Bool && rt == Type::Bool {
                Some(Type::Bool)
            } else {
                self.errors.add(Diagnostic::type_mismatch(
                    Type::Bool,
                    format!("{lt} and {rt}"),
                    format!("operator '{op}' requires boolean operands"),
                    span,
                ));
                None
            }
        };

        let value = match (&ty, &left.value, &right.value) {
            (Some(_), Some(l), Some(r)) => fold_binary(op, l, r),
            _ => None,
        };
        (ty, value)
    }

    fn check_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        span: Span,
    ) -> (Option<Type>, Option<Value>) {
        let Some(ty) = operand.ty else {
            return (None, None);
        };

        let result = match (op, ty) {
            (UnOp::Neg, Type::Int | Type::Float) => Some(ty),
            (UnOp::Not, Type::Bool) => Some(Type::Bool),
            _ => {
                let expected = match op {
                    UnOp::Neg => "numeric type",
                    UnOp::Not => "bool",
                };
                self.errors.add(Diagnostic::type_mismatch(
                    expected,
                    ty,
                    format!("operator '{op}' cannot be applied to type '{ty}'"),
                    span,
                ));
                None
            }
        };

        let value = match (&result, &operand.value) {
            (Some(_), Some(v)) => fold_unary(op, v),
            _ => None,
        };
        (result, value)
    }
}

// =============================================================================
// Value folding
// =============================================================================

/// Fold a binary operation over two known literal values.
///
/// Returns `None` when the operation is not defined over the values or
/// the result is not representable (overflow, division by zero); the
/// expression then simply carries no folded value.
fn fold_binary(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    if op.is_arithmetic() {
        fold_arithmetic(op, left, right)
    } else if op.is_relational() {
        fold_relational(op, left, right)
    } else {
        match (op, left, right) {
            (BinOp::And, Value::Bool(l), Value::Bool(r)) => Some(Value::Bool(*l && *r)),
            (BinOp::Or, Value::Bool(l), Value::Bool(r)) => Some(Value::Bool(*l || *r)),
            _ => None,
        }
    }
}

fn fold_arithmetic(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => match op {
            BinOp::Add => l.checked_add(*r).map(Value::Int),
            BinOp::Sub => l.checked_sub(*r).map(Value::Int),
            BinOp::Mul => l.checked_mul(*r).map(Value::Int),
            BinOp::Div => {
                if *r == 0 {
                    // Division by a folded zero: leave the value unset
                    None
                } else if l % r == 0 {
                    Some(Value::Int(l / r))
                } else {
                    // Inexact integer division folds to the float quotient
                    Some(Value::Float(*l as f64 / *r as f64))
                }
            }
            _ => None,
        },

        (Value::Str(l), Value::Str(r)) => {
            (op == BinOp::Add).then(|| Value::Str(format!("{l}{r}")))
        }

        _ => {
            let l = left.as_f64()?;
            let r = right.as_f64()?;
            match op {
                BinOp::Add => Some(Value::Float(l + r)),
                BinOp::Sub => Some(Value::Float(l - r)),
                BinOp::Mul => Some(Value::Float(l * r)),
                BinOp::Div => (r != 0.0).then(|| Value::Float(l / r)),
                _ => None,
            }
        }
    }
}

fn fold_relational(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    let ordering = match (left, right) {
        (Value::Int(l), Value::Int(r)) => l.cmp(r),
        (Value::Str(l), Value::Str(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?)?,
    };

    let result = match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Ge => ordering != Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        _ => return None,
    };
    Some(Value::Bool(result))
}

fn fold_unary(op: UnOp, value: &Value) -> Option<Value> {
    match (op, value) {
        (UnOp::Neg, Value::Int(v)) => v.checked_neg().map(Value::Int),
        (UnOp::Neg, Value::Float(v)) => Some(Value::Float(-v)),
        (UnOp::Not, Value::Bool(v)) => Some(Value::Bool(!v)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::DiagnosticKind;
    use crate::parser::Parser;

    fn run(source: &str) -> (Program, SymbolTable, ErrorCollection) {
        let mut errors = ErrorCollection::new();
        let mut program = Parser::new(source).unwrap().parse().unwrap();
        let mut analyzer = SemanticAnalyzer::new(&mut errors);
        analyzer.analyze(&mut program);
        let table = analyzer.into_symbol_table();
        (program, table, errors)
    }

    /// The expression of the nth statement, which must be an assignment
    fn assigned_expr(program: &Program, n: usize) -> &Expr {
        match &program.statements[n].kind {
            StmtKind::Assignment(assign) => &assign.value,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_declaration_binds_every_identifier() {
        let (program, table, errors) = run("dec x, y;");

        assert!(!errors.has_errors());
        assert_eq!(table.lookup("x").unwrap().ty, Type::Float);
        assert_eq!(table.lookup("y").unwrap().ty, Type::Float);

        match &program.statements[0].kind {
            StmtKind::Declaration(decl) => {
                assert_eq!(decl.list.ty, Some(Type::Float));
                assert_eq!(decl.list.idents[0].ty, Some(Type::Float));
                assert_eq!(decl.list.idents[1].ty, Some(Type::Float));
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let (_, table, errors) = run("ent x; ent x;");

        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Redeclaration);
        // First declaration wins
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_redeclaration_keeps_first_type() {
        let (_, table, errors) = run("ent x; cadena x;");

        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_duplicate_within_one_list() {
        let (_, table, errors) = run("ent x, x;");

        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Redeclaration);
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_undeclared_assignment_target() {
        let (_, _, errors) = run("x = 5;");

        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Undeclared);
    }

    #[test]
    fn test_undeclared_in_expression() {
        let (program, _, errors) = run("ent x; x = y + 1;");

        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Undeclared);
        // The referencing expression ends up typeless
        assert_eq!(assigned_expr(&program, 1).ty, None);
    }

    #[test]
    fn test_undeclared_input_target() {
        let (_, _, errors) = run("scan(x);");

        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Undeclared);
    }

    #[test]
    fn test_narrowing_assignment_rejected() {
        let (_, _, errors) = run("ent x; dec y; y = 1.5; x = y;");

        assert_eq!(errors.semantic().len(), 1);
        match &errors.semantic()[0].kind {
            DiagnosticKind::Type { expected, found } => {
                assert_eq!(expected, "ent");
                assert_eq!(found, "dec");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_widening_assignment_accepted() {
        let (_, table, errors) = run("dec y; ent x; x = 2; y = x;");

        assert!(!errors.has_errors());
        // The target's declared type is unchanged by the int source
        assert_eq!(table.lookup("y").unwrap().ty, Type::Float);
    }

    #[test]
    fn test_fold_int_addition() {
        let (program, _, errors) = run("ent x; x = 2 + 3;");

        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        assert_eq!(expr.ty, Some(Type::Int));
        assert_eq!(expr.value, Some(Value::Int(5)));
    }

    #[test]
    fn test_fold_mixed_addition_widens() {
        let (program, _, errors) = run("dec x; x = 2 + 3.0;");

        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        assert_eq!(expr.ty, Some(Type::Float));
        assert_eq!(expr.value, Some(Value::Float(5.0)));
    }

    #[test]
    fn test_fold_string_concatenation() {
        let (program, _, errors) = run(r#"cadena s; s = "a" + "b";"#);

        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        assert_eq!(expr.ty, Some(Type::Str));
        assert_eq!(expr.value, Some(Value::Str("ab".to_string())));
    }

    #[test]
    fn test_division_by_zero_suppresses_fold() {
        let (program, _, errors) = run("ent x; x = 5 / 0;");

        // Typed int, no diagnostic, but no folded value either
        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        assert_eq!(expr.ty, Some(Type::Int));
        assert_eq!(expr.value, None);
    }

    #[test]
    fn test_float_division_by_zero_suppresses_fold() {
        let (program, _, errors) = run("dec x; x = 1.0 / 0.0;");

        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        assert_eq!(expr.ty, Some(Type::Float));
        assert_eq!(expr.value, None);
    }

    #[test]
    fn test_inexact_int_division_folds_to_quotient() {
        let (program, _, errors) = run("ent x; x = 5 / 2;");

        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        // Static type stays int; the known value is the exact quotient
        assert_eq!(expr.ty, Some(Type::Int));
        assert_eq!(expr.value, Some(Value::Float(2.5)));
    }

    #[test]
    fn test_exact_int_division_stays_int() {
        let (program, _, errors) = run("ent x; x = 6 / 2;");

        assert!(!errors.has_errors());
        assert_eq!(assigned_expr(&program, 1).value, Some(Value::Int(3)));
    }

    #[test]
    fn test_overflow_suppresses_fold() {
        let (program, _, errors) =
            run("ent x; x = 9223372036854775807 + 1;");

        assert!(!errors.has_errors());
        let expr = assigned_expr(&program, 1);
        assert_eq!(expr.ty, Some(Type::Int));
        assert_eq!(expr.value, None);
    }

    #[test]
    fn test_fold_relational_and_logical() {
        let (program, _, errors) = run("ent x; x = 0; si ((1 < 2) && (2 == 2)) { x = 1; }");

        assert!(!errors.has_errors());
        match &program.statements[2].kind {
            StmtKind::If { condition, .. } => {
                assert_eq!(condition.ty, Some(Type::Bool));
                assert_eq!(condition.value, Some(Value::Bool(true)));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_fold_unary() {
        let (program, _, errors) = run("ent x; dec y; x = -5; y = -2.5;");

        assert!(!errors.has_errors());
        assert_eq!(assigned_expr(&program, 2).value, Some(Value::Int(-5)));
        assert_eq!(assigned_expr(&program, 3).value, Some(Value::Float(-2.5)));
    }

    #[test]
    fn test_unary_on_wrong_type() {
        let (_, _, errors) = run(r#"cadena s; s = -"a";"#);

        // The negation errors once; the assignment stays silent on the
        // already-typeless expression
        assert_eq!(errors.semantic().len(), 1);
        assert!(matches!(
            errors.semantic()[0].kind,
            DiagnosticKind::Type { .. }
        ));
    }

    #[test]
    fn test_string_arithmetic_rejected() {
        let (_, _, errors) = run(r#"cadena s; s = "a" - "b";"#);

        assert_eq!(errors.semantic().len(), 1);
        assert!(matches!(
            errors.semantic()[0].kind,
            DiagnosticKind::Type { .. }
        ));
    }

    #[test]
    fn test_relational_mixed_numeric_ok() {
        let (_, _, errors) = run("ent x; x = 0; si (x < 1.5) { }");
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_relational_same_type_strings_ok() {
        let (program, _, errors) = run(r#"ent x; si ("a" < "b") { x = 1; }"#);

        assert!(!errors.has_errors());
        match &program.statements[1].kind {
            StmtKind::If { condition, .. } => {
                assert_eq!(condition.value, Some(Value::Bool(true)));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_relational_string_number_rejected() {
        let (_, _, errors) = run(r#"ent x; x = 0; si (x > "a") { }"#);

        assert_eq!(errors.semantic().len(), 1);
        assert!(matches!(
            errors.semantic()[0].kind,
            DiagnosticKind::Type { .. }
        ));
    }

    #[test]
    fn test_logical_requires_booleans() {
        let (_, _, errors) = run("ent x; x = 1; si (x && (x > 0)) { }");

        assert_eq!(errors.semantic().len(), 1);
        match &errors.semantic()[0].kind {
            DiagnosticKind::Type { expected, .. } => assert_eq!(expected, "bool"),
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_while_condition_must_be_boolean() {
        let (_, _, errors) = run("ent x; x = 1; mientras (x) { }");

        assert_eq!(errors.semantic().len(), 1);
        match &errors.semantic()[0].kind {
            DiagnosticKind::Type { expected, found } => {
                assert_eq!(expected, "bool");
                assert_eq!(found, "ent");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_while_relational_condition_ok() {
        let (_, _, errors) = run("ent x; x = 1; mientras (x > 0) { x = x - 1; }");
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_repeat_count_must_be_integer() {
        let (_, _, errors) = run("repetir (1.5) { }");

        assert_eq!(errors.semantic().len(), 1);
        match &errors.semantic()[0].kind {
            DiagnosticKind::Type { expected, found } => {
                assert_eq!(expected, "ent");
                assert_eq!(found, "dec");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_repeat_integer_count_ok() {
        let (_, _, errors) = run("ent n; n = 3; repetir (n) { sout(n); }");
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_print_accepts_any_type() {
        let (_, _, errors) = run(r#"sout(1); sout(2.5); sout("hola"); sout(1 < 2);"#);
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_block_scope_ends_with_construct() {
        let (_, _, errors) = run("si (1 < 2) { ent x; x = 1; } x = 2;");

        // The trailing assignment refers to a name that died with the scope
        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Undeclared);
    }

    #[test]
    fn test_sibling_scopes_may_reuse_names() {
        let (_, _, errors) =
            run("si (1 < 2) { ent x; x = 1; } oNo { cadena x; } mientras (1 < 2) { dec x; }");
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let (_, table, errors) = run("ent x; x = 1; si (1 < 2) { cadena x; x = \"a\"; }");

        assert!(!errors.has_errors());
        // Outer binding survives with its own type and value
        let outer = table.lookup("x").unwrap();
        assert_eq!(outer.ty, Type::Int);
        assert_eq!(outer.value, Some(Value::Int(1)));
    }

    #[test]
    fn test_none_condition_does_not_cascade() {
        let (_, _, errors) = run("si (y > 0) { }");

        // Only the undeclared 'y'; the condition check stays silent
        assert_eq!(errors.semantic().len(), 1);
        assert_eq!(errors.semantic()[0].kind, DiagnosticKind::Undeclared);
    }

    #[test]
    fn test_all_independent_errors_in_one_pass() {
        let (_, _, errors) = run("x = 1; ent y; ent y; mientras (y) { }");

        let kinds: Vec<&DiagnosticKind> =
            errors.semantic().iter().map(|d| &d.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(*kinds[0], DiagnosticKind::Undeclared);
        assert_eq!(*kinds[1], DiagnosticKind::Redeclaration);
        assert!(matches!(kinds[2], DiagnosticKind::Type { .. }));
    }

    #[test]
    fn test_constant_propagation_through_variables() {
        let (program, _, errors) = run("ent x, y; x = 4; y = x + 1;");

        assert!(!errors.has_errors());
        assert_eq!(assigned_expr(&program, 2).value, Some(Value::Int(5)));
    }

    #[test]
    fn test_scan_invalidates_known_value() {
        let (_, table, errors) = run("ent x; x = 5; scan(x);");

        assert!(!errors.has_errors());
        let sym = table.lookup("x").unwrap();
        assert_eq!(sym.ty, Type::Int);
        assert_eq!(sym.value, None);
    }

    #[test]
    fn test_end_to_end_widening_program() {
        let (_, table, errors) = run("ent x; x = 5; dec y; y = x;");

        assert!(!errors.has_errors());
        let y = table.lookup("y").unwrap();
        assert_eq!(y.ty, Type::Float);
        assert_eq!(y.value, Some(Value::Int(5)));
    }

    #[test]
    fn test_end_to_end_string_into_int() {
        let (_, _, errors) = run(r#"ent x; x = "a";"#);

        assert_eq!(errors.semantic().len(), 1);
        match &errors.semantic()[0].kind {
            DiagnosticKind::Type { expected, found } => {
                assert_eq!(expected, "ent");
                assert_eq!(found, "cadena");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_result_reflects_semantic_errors_only() {
        let mut errors = ErrorCollection::new();
        let mut program = Parser::new("ent x; x = 1;").unwrap().parse().unwrap();
        assert!(SemanticAnalyzer::new(&mut errors).analyze(&mut program));

        let mut program = Parser::new("x = 1;").unwrap().parse().unwrap();
        assert!(!SemanticAnalyzer::new(&mut errors).analyze(&mut program));
    }

    #[test]
    fn test_reanalysis_starts_fresh() {
        let mut errors = ErrorCollection::new();
        let mut program = Parser::new("x = 1;").unwrap().parse().unwrap();

        let mut analyzer = SemanticAnalyzer::new(&mut errors);
        assert!(!analyzer.analyze(&mut program));
        // Same program again: the earlier diagnostics are not doubled
        assert!(!analyzer.analyze(&mut program));
        drop(analyzer);

        assert_eq!(errors.semantic().len(), 1);
    }

    #[test]
    fn test_symbol_read_out_order_and_positions() {
        let source = "ent x;\ndec y;\nx = 2;";
        let mut errors = ErrorCollection::new();
        let mut program = Parser::new(source).unwrap().parse().unwrap();
        let mut analyzer = SemanticAnalyzer::new(&mut errors);
        analyzer.analyze(&mut program);

        let table = analyzer.into_symbol_table();
        let globals: Vec<_> = table.globals().collect();
        assert_eq!(globals.len(), 2);
        assert_eq!(globals[0].name, "x");
        assert_eq!(globals[0].value, Some(Value::Int(2)));
        assert_eq!(globals[1].name, "y");

        let index = crate::common::LineIndex::new(source);
        assert_eq!(index.location(globals[1].decl_span.start).line, 2);
    }
}
