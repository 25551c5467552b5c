//! Abstract Syntax Tree definitions

mod expr;
mod stmt;
mod types;

pub use expr::*;
pub use stmt::*;
pub use types::*;

/// A complete source program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Render an indented tree of the program, for --dump-ast
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str("Program\n");
        for stmt in &self.statements {
            dump_stmt(stmt, 1, &mut out);
        }
        out
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn dump_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
    indent(depth, out);
    match &stmt.kind {
        StmtKind::Declaration(decl) => {
            let names: Vec<&str> = decl.list.idents.iter().map(|i| i.name.as_str()).collect();
            out.push_str(&format!(
                "Declaration {} {}\n",
                decl.declared_type,
                names.join(", ")
            ));
        }
        StmtKind::Assignment(assign) => {
            out.push_str(&format!("Assignment {}\n", assign.target.name));
            dump_expr(&assign.value, depth + 1, out);
        }
        StmtKind::If {
            condition,
            then_body,
            else_body,
        } => {
            out.push_str("If\n");
            dump_expr(condition, depth + 1, out);
            dump_block(then_body, depth + 1, out);
            if let Some(else_body) = else_body {
                indent(depth, out);
                out.push_str("Else\n");
                dump_block(else_body, depth + 1, out);
            }
        }
        StmtKind::While { condition, body } => {
            out.push_str("While\n");
            dump_expr(condition, depth + 1, out);
            dump_block(body, depth + 1, out);
        }
        StmtKind::Repeat { count, body } => {
            out.push_str("Repeat\n");
            dump_expr(count, depth + 1, out);
            dump_block(body, depth + 1, out);
        }
        StmtKind::Print(expr) => {
            out.push_str("Print\n");
            dump_expr(expr, depth + 1, out);
        }
        StmtKind::Input(var) => {
            out.push_str(&format!("Input {}\n", var.name));
        }
    }
}

fn dump_block(block: &Block, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str("Block\n");
    for stmt in &block.statements {
        dump_stmt(stmt, depth + 1, out);
    }
}

fn dump_expr(expr: &Expr, depth: usize, out: &mut String) {
    indent(depth, out);
    match &expr.kind {
        ExprKind::IntLiteral(v) => out.push_str(&format!("Int {v}\n")),
        ExprKind::FloatLiteral(v) => out.push_str(&format!("Float {v}\n")),
        ExprKind::StringLiteral(v) => out.push_str(&format!("String \"{v}\"\n")),
        ExprKind::Variable(name) => out.push_str(&format!("Variable {name}\n")),
        ExprKind::Binary { op, left, right } => {
            out.push_str(&format!("Binary {op}\n"));
            dump_expr(left, depth + 1, out);
            dump_expr(right, depth + 1, out);
        }
        ExprKind::Unary { op, operand } => {
            out.push_str(&format!("Unary {op}\n"));
            dump_expr(operand, depth + 1, out);
        }
    }
}
