//! The raw syntax tree of a FlatZinc file.
//!
//! Every type mirrors a nonterminal of the FlatZinc grammar. Nothing is resolved at this stage:
//! identifiers are kept as written, and an empty set `{}` is kept as [`BasicLiteralExpr::EmptySet`]
//! because it is not yet known whether it holds integers or floats.
use std::fmt::Display;
use std::rc::Rc;

/// A parsed FlatZinc file. Items are kept in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawModel {
    pub predicates: Vec<Node<PredicateItem>>,
    pub parameters: Vec<Node<ParDeclItem>>,
    pub variables: Vec<Node<VarDeclItem>>,
    pub constraints: Vec<Node<ConstraintItem>>,
    pub solve: Node<SolveItem>,
}

/// `bool`, `int`, `float` or `set of int`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasicParType {
    Bool,
    Int,
    Float,
    SetOfInt,
}

/// The index set `1..upper_bound` of an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexSet {
    pub upper_bound: i64,
}

impl IndexSet {
    pub fn size(&self) -> i64 {
        self.upper_bound
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParType {
    Basic(BasicParType),
    Array {
        index_set: IndexSet,
        element: BasicParType,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum BasicVarType {
    /// `var bool`
    Bool,
    /// `var int`
    IntUnbounded,
    /// `var 1..5`
    IntBounded { lower_bound: i64, upper_bound: i64 },
    /// `var {1, 3, 5}`
    IntSet(Vec<i64>),
    /// `var float`
    FloatUnbounded,
    /// `var 0.0..1.0`
    FloatBounded { lower_bound: f64, upper_bound: f64 },
    /// `var set of 1..5`
    SetBounded { lower_bound: i64, upper_bound: i64 },
    /// `var set of {1, 3, 5}`
    SetSet(Vec<i64>),
    /// `var set of int`
    SetUnbounded,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayVarType {
    pub index_set: IndexSet,
    pub element: BasicVarType,
}

/// The index set of an array parameter of a predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredIndexSet {
    Bounded(IndexSet),
    /// `int`
    Unbounded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BasicPredParamType {
    Par(BasicParType),
    Var(BasicVarType),
    IntBounded { lower_bound: i64, upper_bound: i64 },
    FloatBounded { lower_bound: f64, upper_bound: f64 },
    IntSet(Vec<i64>),
    SetBounded { lower_bound: i64, upper_bound: i64 },
    SetSet(Vec<i64>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PredParamType {
    Basic(BasicPredParamType),
    Array {
        index_set: PredIndexSet,
        element: BasicPredParamType,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredParam {
    pub ty: PredParamType,
    pub identifier: Rc<str>,
}

/// `predicate my_pred(var int: x, array [int] of int: ys);`
#[derive(Clone, Debug, PartialEq)]
pub struct PredicateItem {
    pub identifier: Rc<str>,
    pub parameters: Vec<PredParam>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BasicLiteralExpr {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// `{}`, which can be either an int set or a float set.
    EmptySet,
    IntSetBounded { lower_bound: i64, upper_bound: i64 },
    IntSet(Vec<i64>),
    FloatSetBounded { lower_bound: f64, upper_bound: f64 },
    FloatSet(Vec<f64>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum BasicExpr {
    Literal(BasicLiteralExpr),
    Identifier(Rc<str>),
}

/// An argument of a constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Basic(BasicExpr),
    Array(Vec<BasicExpr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParExpr {
    Basic(BasicLiteralExpr),
    Array(Vec<BasicLiteralExpr>),
}

/// `int: n = 5;`
#[derive(Clone, Debug, PartialEq)]
pub struct ParDeclItem {
    pub ty: ParType,
    pub identifier: Rc<str>,
    pub expr: ParExpr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BasicAnnExpr {
    Literal(BasicLiteralExpr),
    /// A string literal with escapes resolved and without quotes.
    String(Rc<str>),
    /// A nested annotation. An identifier on its own is an annotation without arguments.
    Annotation(Annotation),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub identifier: Rc<str>,
    /// Each argument is a group of expressions. A bare expression is a group of one.
    pub expressions: Vec<Vec<BasicAnnExpr>>,
}

/// `var 1..5: x :: output_var = 3;`
#[derive(Clone, Debug, PartialEq)]
pub struct BasicVarDecl {
    pub ty: BasicVarType,
    pub identifier: Rc<str>,
    pub annotations: Vec<Annotation>,
    pub expr: Option<BasicExpr>,
}

/// `array [1..2] of var int: xs = [x, 3];`
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayVarDecl {
    pub ty: ArrayVarType,
    pub identifier: Rc<str>,
    pub annotations: Vec<Annotation>,
    pub literals: Vec<BasicExpr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VarDeclItem {
    Basic(BasicVarDecl),
    Array(ArrayVarDecl),
}

impl VarDeclItem {
    pub fn identifier(&self) -> &Rc<str> {
        match self {
            VarDeclItem::Basic(decl) => &decl.identifier,
            VarDeclItem::Array(decl) => &decl.identifier,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            VarDeclItem::Basic(decl) => &decl.annotations,
            VarDeclItem::Array(decl) => &decl.annotations,
        }
    }
}

/// `constraint int_lin_le([1, 2], [x, y], 5);`
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintItem {
    pub identifier: Rc<str>,
    pub expressions: Vec<Expr>,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizationType {
    Minimize,
    Maximize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolveItem {
    Satisfy {
        annotations: Vec<Annotation>,
    },
    Optimize {
        annotations: Vec<Annotation>,
        ty: OptimizationType,
        expr: BasicExpr,
    },
}

impl SolveItem {
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            SolveItem::Satisfy { annotations } | SolveItem::Optimize { annotations, .. } => {
                annotations
            }
        }
    }
}

/// Describes a range `[start, end)` in the model file that contains a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// The index in the source that starts the span.
    pub start: usize,
    /// The index in the source that ends the span.
    ///
    /// Note the end is exclusive.
    pub end: usize,
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

impl chumsky::span::Span for Span {
    type Context = ();

    type Offset = usize;

    fn new(_: Self::Context, range: std::ops::Range<Self::Offset>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    fn context(&self) -> Self::Context {}

    fn start(&self) -> Self::Offset {
        self.start
    }

    fn end(&self) -> Self::Offset {
        self.end
    }
}

impl From<chumsky::span::SimpleSpan> for Span {
    fn from(value: chumsky::span::SimpleSpan) -> Self {
        Span {
            start: value.start,
            end: value.end,
        }
    }
}

/// An item of the model together with its location in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<T> {
    /// The span in the source of this node.
    pub span: Span,
    /// The parsed node.
    pub node: T,
}
