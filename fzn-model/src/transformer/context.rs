use std::rc::Rc;

use crate::ast;
use crate::containers::HashMap;
use crate::model::Model;
use crate::options::ParseOptions;

pub(crate) struct TransformationContext<'a> {
    pub(crate) options: &'a ParseOptions,

    /// The declared parameters with their (type-checked) values.
    pub(crate) parameters: HashMap<Rc<str>, ast::ParExpr>,
    /// The declared variables, before they are materialised.
    pub(crate) declarations: HashMap<Rc<str>, Declaration>,

    /// The model under construction.
    pub(crate) model: Model,
}

impl<'a> TransformationContext<'a> {
    pub(crate) fn new(options: &'a ParseOptions) -> TransformationContext<'a> {
        TransformationContext {
            options,
            parameters: Default::default(),
            declarations: Default::default(),
            model: Default::default(),
        }
    }

    /// Whether `identifier` is already taken by a parameter or a variable.
    pub(crate) fn is_declared(&self, identifier: &str) -> bool {
        self.parameters.contains_key(identifier) || self.declarations.contains_key(identifier)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Declaration {
    /// The index of the declaration among the variable items.
    pub(crate) position: usize,
    pub(crate) kind: DeclarationKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeclarationKind {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl DeclarationKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            DeclarationKind::Scalar(kind) => kind.var_name(),
            DeclarationKind::Array(ScalarKind::Bool) => "array of var bool",
            DeclarationKind::Array(ScalarKind::Int) => "array of var int",
            DeclarationKind::Array(ScalarKind::Float) => "array of var float",
            DeclarationKind::Array(ScalarKind::Set) => "array of var set of int",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScalarKind {
    Bool,
    Int,
    Float,
    Set,
}

impl ScalarKind {
    pub(crate) fn of(ty: &ast::BasicVarType) -> ScalarKind {
        match ty {
            ast::BasicVarType::Bool => ScalarKind::Bool,
            ast::BasicVarType::IntUnbounded
            | ast::BasicVarType::IntBounded { .. }
            | ast::BasicVarType::IntSet(_) => ScalarKind::Int,
            ast::BasicVarType::FloatUnbounded | ast::BasicVarType::FloatBounded { .. } => {
                ScalarKind::Float
            }
            ast::BasicVarType::SetBounded { .. }
            | ast::BasicVarType::SetSet(_)
            | ast::BasicVarType::SetUnbounded => ScalarKind::Set,
        }
    }

    /// The name of a literal of this kind.
    pub(crate) fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Set => "set of int",
        }
    }

    /// The name of a variable of this kind.
    pub(crate) fn var_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "var bool",
            ScalarKind::Int => "var int",
            ScalarKind::Float => "var float",
            ScalarKind::Set => "var set of int",
        }
    }
}

impl ast::VarDeclItem {
    pub(crate) fn kind(&self) -> DeclarationKind {
        match self {
            ast::VarDeclItem::Basic(decl) => DeclarationKind::Scalar(ScalarKind::of(&decl.ty)),
            ast::VarDeclItem::Array(decl) => {
                DeclarationKind::Array(ScalarKind::of(&decl.ty.element))
            }
        }
    }
}
