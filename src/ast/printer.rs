//! Indented tree dump of the AST, used by `toyc parse`.

use super::{
    ast::{Expr, ExprKind, ParsedFile},
    statements::Block,
};

#[derive(Default)]
pub struct AstPrinter {
    output: String,
    indent: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        AstPrinter::default()
    }

    pub fn print_file(mut self, file: &ParsedFile) -> String {
        self.line(&file.file.name);
        self.indented(|printer| {
            for item in &file.items {
                printer.visit(item);
            }
        });
        self.output
    }

    pub fn print_expr(mut self, expr: &Expr) -> String {
        self.visit(expr);
        self.output
    }

    fn line(&mut self, text: &str) {
        for i in 0..self.indent {
            if i == self.indent - 1 {
                self.output.push_str("└─");
            } else {
                self.output.push_str("  ");
            }
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }

    fn visit_block(&mut self, block: &Block) {
        self.line("Block:");
        self.indented(|printer| {
            for item in &block.items {
                printer.visit(item);
            }
        });
    }

    fn visit(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Number(text) => self.line(&format!("Number: {}", text)),
            ExprKind::Boolean(value) => self.line(&value.to_string()),
            ExprKind::Identifier(identifier) => {
                self.line(&format!("Identifier: {}", identifier.name))
            }
            ExprKind::Binary(binary) => {
                self.line(&format!("{:?}", binary.operator));
                self.indented(|printer| {
                    printer.visit(&binary.left);
                    printer.visit(&binary.right);
                });
            }
            ExprKind::Unary(unary) => {
                self.line(&format!("{:?}", unary.operator));
                self.indented(|printer| printer.visit(&unary.operand));
            }
            ExprKind::Call(call) => {
                self.line("Call:");
                self.indented(|printer| {
                    printer.line(&call.callee.name);
                    for argument in &call.arguments {
                        printer.visit(argument);
                    }
                });
            }
            ExprKind::Block(block) => self.visit_block(block),
            ExprKind::If(if_expr) => {
                self.line("if");
                self.indented(|printer| printer.visit(&if_expr.condition));
                self.line("then");
                self.indented(|printer| printer.visit_block(&if_expr.then_branch));
                for else_if in &if_expr.else_ifs {
                    self.line("elseif");
                    self.indented(|printer| {
                        printer.visit(&else_if.condition);
                        printer.visit_block(&else_if.then_branch);
                    });
                }
                if let Some(else_branch) = &if_expr.else_branch {
                    self.line("else");
                    self.indented(|printer| printer.visit_block(else_branch));
                }
            }
            ExprKind::While(while_expr) => {
                self.line("while");
                self.indented(|printer| printer.visit(&while_expr.condition));
                self.line("do");
                self.indented(|printer| printer.visit_block(&while_expr.body));
            }
            ExprKind::Function(function) => {
                self.line(&format!("Function: {}", function.name.name));
                self.indented(|printer| {
                    if let Some(return_type) = &function.return_type {
                        printer.line(&format!("Return type: {}", return_type));
                    }
                    printer.line("Params:");
                    printer.indented(|printer| {
                        for param in &function.params {
                            printer.line(&format!("{}: {}", param.name.name, param.ty));
                        }
                    });
                    printer.line("Body:");
                    printer.indented(|printer| {
                        for item in &function.body.items {
                            printer.visit(item);
                        }
                    });
                });
            }
            ExprKind::Let(let_decl) => {
                self.line("Let");
                self.indented(|printer| {
                    printer.line(&format!("{}: {}", let_decl.name.name, let_decl.ty));
                    printer.visit(&let_decl.value);
                });
            }
            ExprKind::Assign(assign) => {
                self.line("Assign");
                self.indented(|printer| {
                    printer.line(&assign.target.name);
                    printer.visit(&assign.value);
                });
            }
            ExprKind::Return(return_expr) => {
                self.line("return");
                if let Some(value) = &return_expr.value {
                    self.indented(|printer| printer.visit(value));
                }
            }
        }
    }
}
