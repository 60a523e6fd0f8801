use super::{
    ast::{Expr, NodeId},
    expressions::Identifier,
    types::TypeExpr,
};

/// `{ item; item; ... }`. Its value is the value of the last item.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub items: Vec<Expr>,
}

impl Block {
    pub fn visit_ids(&self, visit: &mut impl FnMut(NodeId)) {
        visit(self.id);
        self.visit_items(visit);
    }

    pub fn visit_items(&self, visit: &mut impl FnMut(NodeId)) {
        for item in &self.items {
            item.visit_ids(visit);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_branch: Block,
    pub else_ifs: Vec<ElseIf>,
    pub else_branch: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expr,
    pub then_branch: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileExpr {
    pub condition: Box<Expr>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncParam {
    pub name: Identifier,
    pub ty: TypeExpr,
}

/// `func name(params...) [-> type] { body }`. A missing return type means `void`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<FuncParam>,
    pub return_type: Option<TypeExpr>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetDecl {
    pub name: Identifier,
    pub ty: TypeExpr,
    pub value: Box<Expr>,
}
