use std::{fmt::Display, rc::Rc};

use crate::{
    context::context::SourceFile,
    errors::errors::{Error, ErrorImpl},
    get_source_span,
    lexer::tokens::Token,
    SourceSpan,
};

use super::{
    expressions::{AssignExpr, BinaryExpr, CallExpr, Identifier, ReturnExpr, UnaryExpr},
    statements::{Block, FunctionDecl, IfExpr, LetDecl, WhileExpr},
};

/// Stable index of a node inside one parsed file, assigned at construction.
///
/// Every fact computed about a node after parsing (its source range, its
/// type, the symbol it resolves to) lives in a side table keyed by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
}

/// The closed set of expression forms. Items and statements are
/// expressions too, `func` and `let` are simply the only ones allowed at the
/// top level of a file.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(String),
    Boolean(bool),
    Identifier(Identifier),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Block(Block),
    If(IfExpr),
    While(WhileExpr),
    Function(FunctionDecl),
    Let(LetDecl),
    Assign(AssignExpr),
    Return(ReturnExpr),
}

impl Expr {
    /// Whether the expression ends with a closing brace.
    pub fn is_block_like(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Block(_) | ExprKind::If(_) | ExprKind::While(_) | ExprKind::Function(_)
        )
    }

    /// Calls `visit` with the id of this node and of every node below it.
    pub fn visit_ids(&self, visit: &mut impl FnMut(NodeId)) {
        visit(self.id);

        match &self.kind {
            ExprKind::Number(_) | ExprKind::Boolean(_) | ExprKind::Identifier(_) => {}
            ExprKind::Binary(binary) => {
                binary.left.visit_ids(visit);
                binary.right.visit_ids(visit);
            }
            ExprKind::Unary(unary) => unary.operand.visit_ids(visit),
            ExprKind::Call(call) => {
                visit(call.callee.id);
                for argument in &call.arguments {
                    argument.visit_ids(visit);
                }
            }
            ExprKind::Block(block) => block.visit_items(visit),
            ExprKind::If(if_expr) => {
                if_expr.condition.visit_ids(visit);
                if_expr.then_branch.visit_ids(visit);
                for else_if in &if_expr.else_ifs {
                    else_if.condition.visit_ids(visit);
                    else_if.then_branch.visit_ids(visit);
                }
                if let Some(else_branch) = &if_expr.else_branch {
                    else_branch.visit_ids(visit);
                }
            }
            ExprKind::While(while_expr) => {
                while_expr.condition.visit_ids(visit);
                while_expr.body.visit_ids(visit);
            }
            ExprKind::Function(function) => {
                visit(function.name.id);
                for param in &function.params {
                    visit(param.name.id);
                    visit(param.ty.id);
                }
                if let Some(return_type) = &function.return_type {
                    visit(return_type.id);
                }
                function.body.visit_ids(visit);
            }
            ExprKind::Let(let_decl) => {
                visit(let_decl.name.id);
                visit(let_decl.ty.id);
                let_decl.value.visit_ids(visit);
            }
            ExprKind::Assign(assign) => {
                visit(assign.target.id);
                assign.value.visit_ids(visit);
            }
            ExprKind::Return(return_expr) => {
                if let Some(value) = &return_expr.value {
                    value.visit_ids(visit);
                }
            }
        }
    }
}

/// Start and end token of every node of one file, indexed by [`NodeId`].
#[derive(Debug, Clone, Default)]
pub struct NodeRanges {
    ranges: Vec<Option<(Token, Token)>>,
}

impl NodeRanges {
    pub fn new() -> Self {
        NodeRanges::default()
    }

    /// Reserves the next node id without recording a range for it yet.
    pub fn next_id(&mut self) -> NodeId {
        self.ranges.push(None);
        NodeId((self.ranges.len() - 1) as u32)
    }

    pub fn stamp(&mut self, id: NodeId, start: Token, end: Token) {
        if let Some(range) = self.ranges.get_mut(id.index()) {
            *range = Some((start, end));
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<(Token, Token)> {
        self.ranges.get(id.index()).copied().flatten()
    }

    pub fn start_of(&self, id: NodeId) -> Result<Token, Error> {
        self.get(id).map(|(start, _)| start).ok_or_else(|| missing_range(id))
    }

    pub fn end_of(&self, id: NodeId) -> Result<Token, Error> {
        self.get(id).map(|(_, end)| end).ok_or_else(|| missing_range(id))
    }

    /// Verifies that every node reachable from `items` carries a range.
    pub fn check_complete(&self, items: &[Expr]) -> Result<(), Error> {
        let mut missing = None;

        for item in items {
            item.visit_ids(&mut |id| {
                if missing.is_none() && self.get(id).is_none() {
                    missing = Some(id);
                }
            });
        }

        match missing {
            Some(id) => Err(missing_range(id)),
            None => Ok(()),
        }
    }
}

fn missing_range(id: NodeId) -> Error {
    Error::without_span(ErrorImpl::UnresolvedNode {
        what: "source range",
        node: id,
    })
}

/// The output of parsing one file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: Rc<SourceFile>,
    pub items: Vec<Expr>,
    pub ranges: NodeRanges,
}

impl ParsedFile {
    /// Source span covered by a node, for diagnostics.
    pub fn span_of(&self, id: NodeId) -> Option<SourceSpan> {
        let (start, end) = self.ranges.get(id)?;
        if start.file_uid != self.file.uid || end.file_uid != self.file.uid {
            return None;
        }

        Some(get_source_span(
            &self.file.contents,
            start.start_offset,
            end.end_offset.max(start.start_offset),
        ))
    }

    pub fn check_source_ranges(&self) -> Result<(), Error> {
        self.ranges.check_complete(&self.items)
    }
}
