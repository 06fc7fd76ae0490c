//! Materialise the variable declarations into the model, in declaration order.
use std::rc::Rc;

use log::debug;

use super::annotations;
use super::context::ScalarKind;
use super::context::TransformationContext;
use super::value::resolve_scalar;
use super::value::ResolveScalar;
use super::value::Value;
use crate::ast;
use crate::model::Annotation;
use crate::model::BoolDomain;
use crate::model::BoolVar;
use crate::model::FloatSet;
use crate::model::FloatVar;
use crate::model::IntSet;
use crate::model::IntVar;
use crate::model::SetVar;
use crate::model::Var;
use crate::model::VarArray;
use crate::model::VarReference;
use crate::FznError;

pub(crate) fn run(
    variables: Vec<ast::Node<ast::VarDeclItem>>,
    context: &mut TransformationContext,
) -> Result<(), FznError> {
    for variable in variables {
        let var = match variable.node {
            ast::VarDeclItem::Basic(decl) => create_scalar(decl, context)?,
            ast::VarDeclItem::Array(decl) => create_array(decl, context)?,
        };

        context.model.add_variable(var)?;
    }

    debug!(
        "created {} variables, {} of which are output",
        context.model.num_variables(),
        context.model.output_variables().count()
    );

    Ok(())
}

fn create_scalar(
    decl: ast::BasicVarDecl,
    context: &TransformationContext,
) -> Result<Var, FznError> {
    let ast::BasicVarDecl {
        ty,
        identifier,
        annotations,
        expr,
    } = decl;

    let annotations = annotations::convert(annotations, context.options.validate_annotations)?;

    let value = match expr {
        None => None,
        Some(ast::BasicExpr::Literal(literal)) => Some(Value::of(&literal)?),
        Some(ast::BasicExpr::Identifier(source)) => {
            let source = context.model.variable(&source)?.clone();
            return Ok(Var::Reference(Rc::new(VarReference::new(
                identifier,
                source,
                annotations,
            ))));
        }
    };

    let expected = ScalarKind::of(&ty).var_name();

    let var = match ty {
        ast::BasicVarType::Bool => match value {
            None => Var::Bool(Rc::new(BoolVar::new(
                identifier,
                BoolDomain::Unconstrained,
                annotations,
            ))),
            Some(Value::Bool(value)) => {
                Var::Bool(Rc::new(BoolVar::fixed(identifier, value, annotations)))
            }
            Some(other) => return Err(mismatch(&identifier, expected, &other)),
        },

        ast::BasicVarType::IntUnbounded
        | ast::BasicVarType::IntBounded { .. }
        | ast::BasicVarType::IntSet(_) => {
            let domain = int_domain(ty)?;

            match value {
                None => Var::Int(Rc::new(IntVar::new(identifier, domain, annotations)?)),
                Some(Value::Int(value)) => {
                    Var::Int(Rc::new(IntVar::fixed(identifier, value, annotations)))
                }
                Some(other) => return Err(mismatch(&identifier, expected, &other)),
            }
        }

        ast::BasicVarType::FloatUnbounded | ast::BasicVarType::FloatBounded { .. } => {
            let domain = float_domain(ty)?;

            match value {
                None => Var::Float(Rc::new(FloatVar::new(identifier, domain, annotations)?)),
                Some(Value::Float(value)) => {
                    Var::Float(Rc::new(FloatVar::fixed(identifier, value, annotations)))
                }
                Some(other) => return Err(mismatch(&identifier, expected, &other)),
            }
        }

        ast::BasicVarType::SetBounded { .. }
        | ast::BasicVarType::SetSet(_)
        | ast::BasicVarType::SetUnbounded => {
            let upper_bound = set_universe(ty)?;

            match value {
                None => Var::Set(Rc::new(SetVar::new(identifier, upper_bound, annotations))),
                Some(Value::IntSet(value)) => {
                    Var::Set(Rc::new(SetVar::fixed(identifier, value, annotations)))
                }
                Some(other) => return Err(mismatch(&identifier, expected, &other)),
            }
        }
    };

    Ok(var)
}

fn create_array(
    decl: ast::ArrayVarDecl,
    context: &TransformationContext,
) -> Result<Var, FznError> {
    let ast::ArrayVarDecl {
        ty,
        identifier,
        annotations,
        literals,
    } = decl;

    let annotations = annotations::convert(annotations, context.options.validate_annotations)?;

    let var = match ty.element {
        ast::BasicVarType::Bool => Var::BoolArray(Rc::new(array::<BoolVar>(
            identifier,
            &literals,
            annotations,
            context,
        )?)),
        ast::BasicVarType::IntUnbounded
        | ast::BasicVarType::IntBounded { .. }
        | ast::BasicVarType::IntSet(_) => Var::IntArray(Rc::new(array::<IntVar>(
            identifier,
            &literals,
            annotations,
            context,
        )?)),
        ast::BasicVarType::FloatUnbounded | ast::BasicVarType::FloatBounded { .. } => {
            Var::FloatArray(Rc::new(array::<FloatVar>(
                identifier,
                &literals,
                annotations,
                context,
            )?))
        }
        ast::BasicVarType::SetBounded { .. }
        | ast::BasicVarType::SetSet(_)
        | ast::BasicVarType::SetUnbounded => Var::SetArray(Rc::new(array::<SetVar>(
            identifier,
            &literals,
            annotations,
            context,
        )?)),
    };

    Ok(var)
}

fn array<V: ResolveScalar>(
    identifier: Rc<str>,
    literals: &[ast::BasicExpr],
    annotations: Vec<Annotation>,
    context: &TransformationContext,
) -> Result<VarArray<V>, FznError> {
    let elements = literals
        .iter()
        .map(|expr| resolve_scalar::<V>(&identifier, expr, context))
        .collect::<Result<Vec<_>, _>>()?;

    VarArray::new(identifier, elements, annotations)
}

fn int_domain(ty: ast::BasicVarType) -> Result<IntSet, FznError> {
    match ty {
        ast::BasicVarType::IntBounded {
            lower_bound,
            upper_bound,
        } => IntSet::interval(lower_bound, upper_bound),
        ast::BasicVarType::IntSet(values) => Ok(IntSet::from_elements(values)),
        _ => IntSet::interval(i64::MIN, i64::MAX),
    }
}

fn float_domain(ty: ast::BasicVarType) -> Result<FloatSet, FznError> {
    match ty {
        ast::BasicVarType::FloatBounded {
            lower_bound,
            upper_bound,
        } => FloatSet::interval(lower_bound, upper_bound),
        _ => FloatSet::interval(f64::MIN, f64::MAX),
    }
}

/// The elements a set variable may contain.
fn set_universe(ty: ast::BasicVarType) -> Result<IntSet, FznError> {
    match ty {
        ast::BasicVarType::SetBounded {
            lower_bound,
            upper_bound,
        } => IntSet::interval(lower_bound, upper_bound),
        ast::BasicVarType::SetSet(values) => Ok(IntSet::from_elements(values)),
        _ => IntSet::interval(i64::MIN, i64::MAX),
    }
}

fn mismatch(identifier: &Rc<str>, expected: &str, value: &Value) -> FznError {
    FznError::TypeMismatch {
        identifier: Rc::clone(identifier),
        expected: expected.into(),
        actual: value.kind_name().into(),
    }
}
