use std::rc::Rc;

use super::context::ScalarKind;
use super::context::TransformationContext;
use crate::ast;
use crate::model::AnnotationExpression;
use crate::model::BoolVar;
use crate::model::FloatSet;
use crate::model::FloatVar;
use crate::model::IntSet;
use crate::model::IntVar;
use crate::model::Scalar;
use crate::model::ScalarVar;
use crate::model::SetVar;
use crate::model::Var;
use crate::FznError;

/// The value of a literal expression.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    IntSet(IntSet),
    FloatSet(FloatSet),
}

impl Value {
    /// Evaluate a literal. An empty set `{}` is an empty int set.
    pub(crate) fn of(literal: &ast::BasicLiteralExpr) -> Result<Value, FznError> {
        let value = match literal {
            ast::BasicLiteralExpr::Bool(boolean) => Value::Bool(*boolean),
            ast::BasicLiteralExpr::Int(int) => Value::Int(*int),
            ast::BasicLiteralExpr::Float(float) => Value::Float(*float),
            ast::BasicLiteralExpr::EmptySet => Value::IntSet(IntSet::empty()),
            ast::BasicLiteralExpr::IntSetBounded {
                lower_bound,
                upper_bound,
            } => Value::IntSet(IntSet::interval(*lower_bound, *upper_bound)?),
            ast::BasicLiteralExpr::IntSet(values) => {
                Value::IntSet(IntSet::from_elements(values.iter().copied()))
            }
            ast::BasicLiteralExpr::FloatSetBounded {
                lower_bound,
                upper_bound,
            } => Value::FloatSet(FloatSet::interval(*lower_bound, *upper_bound)?),
            ast::BasicLiteralExpr::FloatSet(values) => {
                Value::FloatSet(FloatSet::from_elements(values.iter().copied()))
            }
        };

        Ok(value)
    }

    /// The kind of scalar this value can be assigned to. Float sets have no variable kind.
    pub(crate) fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Int(_) => Some(ScalarKind::Int),
            Value::Float(_) => Some(ScalarKind::Float),
            Value::IntSet(_) => Some(ScalarKind::Set),
            Value::FloatSet(_) => None,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self.scalar_kind() {
            Some(kind) => kind.name(),
            None => "set of float",
        }
    }
}

impl From<Value> for AnnotationExpression {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(boolean) => AnnotationExpression::Bool(boolean),
            Value::Int(int) => AnnotationExpression::Int(int),
            Value::Float(float) => AnnotationExpression::Float(float),
            Value::IntSet(set) => AnnotationExpression::IntSet(set),
            Value::FloatSet(set) => AnnotationExpression::FloatSet(set),
        }
    }
}

/// Conversions from resolved values and variables into one scalar variable kind.
pub(crate) trait ResolveScalar: ScalarVar + Sized {
    const KIND: ScalarKind;

    fn from_value(value: Value) -> Option<Self::Value>;

    fn from_var(var: &Var) -> Option<Rc<Self>>;
}

impl ResolveScalar for BoolVar {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_value(value: Value) -> Option<bool> {
        match value {
            Value::Bool(boolean) => Some(boolean),
            _ => None,
        }
    }

    fn from_var(var: &Var) -> Option<Rc<Self>> {
        match var {
            Var::Bool(var) => Some(Rc::clone(var)),
            _ => None,
        }
    }
}

impl ResolveScalar for IntVar {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_value(value: Value) -> Option<i64> {
        match value {
            Value::Int(int) => Some(int),
            _ => None,
        }
    }

    fn from_var(var: &Var) -> Option<Rc<Self>> {
        match var {
            Var::Int(var) => Some(Rc::clone(var)),
            _ => None,
        }
    }
}

impl ResolveScalar for FloatVar {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_value(value: Value) -> Option<f64> {
        match value {
            Value::Float(float) => Some(float),
            _ => None,
        }
    }

    fn from_var(var: &Var) -> Option<Rc<Self>> {
        match var {
            Var::Float(var) => Some(Rc::clone(var)),
            _ => None,
        }
    }
}

impl ResolveScalar for SetVar {
    const KIND: ScalarKind = ScalarKind::Set;

    fn from_value(value: Value) -> Option<IntSet> {
        match value {
            Value::IntSet(set) => Some(set),
            _ => None,
        }
    }

    fn from_var(var: &Var) -> Option<Rc<Self>> {
        match var {
            Var::Set(var) => Some(Rc::clone(var)),
            _ => None,
        }
    }
}

/// Resolve `expr` to a parameter or variable of kind `V`.
///
/// Parameters are replaced by their value and references by the variable they alias. A value or
/// variable of another kind is a [`FznError::TypeMismatch`] attributed to `owner`.
pub(crate) fn resolve_scalar<V: ResolveScalar>(
    owner: &Rc<str>,
    expr: &ast::BasicExpr,
    context: &TransformationContext,
) -> Result<Scalar<V>, FznError> {
    let mismatch = |actual: &str| FznError::TypeMismatch {
        identifier: Rc::clone(owner),
        expected: V::KIND.var_name().into(),
        actual: actual.into(),
    };

    let literal = match expr {
        ast::BasicExpr::Literal(literal) => literal,
        ast::BasicExpr::Identifier(identifier) => match context.parameters.get(identifier) {
            Some(ast::ParExpr::Basic(literal)) => literal,
            Some(ast::ParExpr::Array(_)) => return Err(mismatch("array parameter")),
            None => {
                let var = context.model.variable(identifier)?.resolve();

                return V::from_var(var)
                    .map(Scalar::Variable)
                    .ok_or_else(|| mismatch(var.kind_name()));
            }
        },
    };

    let value = Value::of(literal)?;
    let actual = value.kind_name();

    V::from_value(value)
        .map(Scalar::Parameter)
        .ok_or_else(|| mismatch(actual))
}
