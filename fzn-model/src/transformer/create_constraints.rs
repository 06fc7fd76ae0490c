//! Resolve the arguments of every constraint item.
use std::rc::Rc;

use log::debug;
use log::trace;

use super::annotations;
use super::context::ScalarKind;
use super::context::TransformationContext;
use super::value::resolve_scalar;
use super::value::ResolveScalar;
use super::value::Value;
use crate::ast;
use crate::model::Arg;
use crate::model::BoolVar;
use crate::model::Constraint;
use crate::model::FloatSet;
use crate::model::FloatVar;
use crate::model::IntVar;
use crate::model::Scalar;
use crate::model::SetVar;
use crate::model::Var;
use crate::model::VarArray;
use crate::FznError;

pub(crate) fn run(
    constraints: Vec<ast::Node<ast::ConstraintItem>>,
    context: &mut TransformationContext,
) -> Result<(), FznError> {
    for constraint in constraints {
        let ast::ConstraintItem {
            identifier,
            expressions,
            annotations,
        } = constraint.node;

        let arguments = expressions
            .iter()
            .map(|expr| resolve_argument(&identifier, expr, context))
            .collect::<Result<Vec<_>, _>>()?;
        let annotations = annotations::convert(annotations, context.options.validate_annotations)?;

        trace!("constraint '{identifier}' with {} arguments", arguments.len());

        context
            .model
            .add_constraint(Constraint::new(identifier, arguments, annotations));
    }

    debug!("created {} constraints", context.model.num_constraints());

    Ok(())
}

fn resolve_argument(
    constraint: &Rc<str>,
    expr: &ast::Expr,
    context: &TransformationContext,
) -> Result<Arg, FznError> {
    match expr {
        ast::Expr::Array(elements) => resolve_array(constraint, elements, context),

        ast::Expr::Basic(ast::BasicExpr::Literal(literal)) => {
            Ok(literal_argument(Value::of(literal)?))
        }

        ast::Expr::Basic(ast::BasicExpr::Identifier(identifier)) => {
            match context.parameters.get(identifier) {
                Some(ast::ParExpr::Basic(literal)) => Ok(literal_argument(Value::of(literal)?)),
                Some(ast::ParExpr::Array(literals)) => {
                    let elements = literals
                        .iter()
                        .cloned()
                        .map(ast::BasicExpr::Literal)
                        .collect::<Vec<_>>();

                    resolve_array(constraint, &elements, context)
                }
                None => Ok(variable_argument(context.model.variable(identifier)?.resolve())),
            }
        }
    }
}

fn literal_argument(value: Value) -> Arg {
    match value {
        Value::Bool(boolean) => Arg::Bool(Scalar::Parameter(boolean)),
        Value::Int(int) => Arg::Int(Scalar::Parameter(int)),
        Value::Float(float) => Arg::Float(Scalar::Parameter(float)),
        Value::IntSet(set) => Arg::IntSet(Scalar::Parameter(set)),
        Value::FloatSet(set) => Arg::FloatSet(set),
    }
}

/// `var` must already be resolved, so it is never a reference.
fn variable_argument(var: &Var) -> Arg {
    match var {
        Var::Bool(var) => Arg::Bool(Scalar::Variable(Rc::clone(var))),
        Var::Int(var) => Arg::Int(Scalar::Variable(Rc::clone(var))),
        Var::Float(var) => Arg::Float(Scalar::Variable(Rc::clone(var))),
        Var::Set(var) => Arg::IntSet(Scalar::Variable(Rc::clone(var))),
        Var::BoolArray(array) => Arg::BoolArray(Rc::clone(array)),
        Var::IntArray(array) => Arg::IntArray(Rc::clone(array)),
        Var::FloatArray(array) => Arg::FloatArray(Rc::clone(array)),
        Var::SetArray(array) => Arg::SetArray(Rc::clone(array)),
        Var::Reference(reference) => variable_argument(reference.target()),
    }
}

/// The kind of the elements of an array literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ElementKind {
    Scalar(ScalarKind),
    FloatSet,
}

impl ElementKind {
    fn name(self) -> &'static str {
        match self {
            ElementKind::Scalar(kind) => kind.name(),
            ElementKind::FloatSet => "set of float",
        }
    }
}

/// Build a typed array from an array literal.
///
/// The kind of the array is the kind of its first variable. Without variables it is the kind of
/// the first literal that is not an empty set. An array of only empty sets is a set array, and an
/// array without elements is an int array.
fn resolve_array(
    constraint: &Rc<str>,
    elements: &[ast::BasicExpr],
    context: &TransformationContext,
) -> Result<Arg, FznError> {
    let mut variable_kind = None;
    let mut literal_kind = None;
    let mut has_empty_set = false;

    for element in elements {
        match element_kind(constraint, element, context)? {
            Classified::Variable(kind) => {
                variable_kind = Some(kind);
                break;
            }
            Classified::EmptySet => has_empty_set = true,
            Classified::Literal(kind) => {
                let _ = literal_kind.get_or_insert(kind);
            }
        }
    }

    let kind = variable_kind.or(literal_kind).unwrap_or(if has_empty_set {
        ElementKind::Scalar(ScalarKind::Set)
    } else {
        ElementKind::Scalar(ScalarKind::Int)
    });

    let arg = match kind {
        ElementKind::Scalar(ScalarKind::Bool) => {
            Arg::BoolArray(Rc::new(anonymous_array::<BoolVar>(constraint, elements, context)?))
        }
        ElementKind::Scalar(ScalarKind::Int) => {
            Arg::IntArray(Rc::new(anonymous_array::<IntVar>(constraint, elements, context)?))
        }
        ElementKind::Scalar(ScalarKind::Float) => {
            Arg::FloatArray(Rc::new(anonymous_array::<FloatVar>(constraint, elements, context)?))
        }
        ElementKind::Scalar(ScalarKind::Set) => {
            Arg::SetArray(Rc::new(anonymous_array::<SetVar>(constraint, elements, context)?))
        }
        ElementKind::FloatSet => Arg::FloatSetArray(
            elements
                .iter()
                .map(|element| float_set(constraint, element, context))
                .collect::<Result<Rc<[FloatSet]>, _>>()?,
        ),
    };

    Ok(arg)
}

enum Classified {
    Variable(ElementKind),
    Literal(ElementKind),
    EmptySet,
}

fn element_kind(
    constraint: &Rc<str>,
    element: &ast::BasicExpr,
    context: &TransformationContext,
) -> Result<Classified, FznError> {
    let literal = match element {
        ast::BasicExpr::Literal(literal) => literal,
        ast::BasicExpr::Identifier(identifier) => match context.parameters.get(identifier) {
            Some(ast::ParExpr::Basic(literal)) => literal,
            Some(ast::ParExpr::Array(_)) => {
                return Err(FznError::TypeMismatch {
                    identifier: Rc::clone(constraint),
                    expected: "array element".into(),
                    actual: "array parameter".into(),
                })
            }
            None => {
                let var = context.model.variable(identifier)?.resolve();

                let kind = match var {
                    Var::Bool(_) => ScalarKind::Bool,
                    Var::Int(_) => ScalarKind::Int,
                    Var::Float(_) => ScalarKind::Float,
                    Var::Set(_) => ScalarKind::Set,
                    _ => {
                        return Err(FznError::TypeMismatch {
                            identifier: Rc::clone(constraint),
                            expected: "array element".into(),
                            actual: var.kind_name().into(),
                        })
                    }
                };

                return Ok(Classified::Variable(ElementKind::Scalar(kind)));
            }
        },
    };

    if is_empty_set(literal) {
        return Ok(Classified::EmptySet);
    }

    let kind = match Value::of(literal)?.scalar_kind() {
        Some(kind) => ElementKind::Scalar(kind),
        None => ElementKind::FloatSet,
    };

    Ok(Classified::Literal(kind))
}

fn is_empty_set(literal: &ast::BasicLiteralExpr) -> bool {
    match literal {
        ast::BasicLiteralExpr::EmptySet => true,
        ast::BasicLiteralExpr::IntSet(values) => values.is_empty(),
        _ => false,
    }
}

fn anonymous_array<V: ResolveScalar>(
    constraint: &Rc<str>,
    elements: &[ast::BasicExpr],
    context: &TransformationContext,
) -> Result<VarArray<V>, FznError> {
    elements
        .iter()
        .map(|element| resolve_scalar::<V>(constraint, element, context))
        .collect::<Result<Vec<_>, _>>()
        .map(VarArray::anonymous)
}

/// A float set literal, where an empty set counts as an empty float set.
fn float_set(
    constraint: &Rc<str>,
    element: &ast::BasicExpr,
    context: &TransformationContext,
) -> Result<FloatSet, FznError> {
    let literal = match element {
        ast::BasicExpr::Literal(literal) => Some(literal),
        ast::BasicExpr::Identifier(identifier) => match context.parameters.get(identifier) {
            Some(ast::ParExpr::Basic(literal)) => Some(literal),
            _ => None,
        },
    };

    let actual = match literal {
        Some(literal) if is_empty_set(literal) => return Ok(FloatSet::empty()),
        Some(literal) => match Value::of(literal)? {
            Value::FloatSet(set) => return Ok(set),
            other => other.kind_name(),
        },
        None => "variable",
    };

    Err(FznError::TypeMismatch {
        identifier: Rc::clone(constraint),
        expected: ElementKind::FloatSet.name().into(),
        actual: actual.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntSet;
    use crate::model::ScalarVar;
    use crate::options::ParseOptions;
    use crate::transformer::create_variables;

    fn int_var(identifier: &str) -> ast::Node<ast::VarDeclItem> {
        ast::Node {
            span: ast::Span { start: 0, end: 0 },
            node: ast::VarDeclItem::Basic(ast::BasicVarDecl {
                ty: ast::BasicVarType::IntUnbounded,
                identifier: identifier.into(),
                annotations: vec![],
                expr: None,
            }),
        }
    }

    fn constraint(identifier: &str, expressions: Vec<ast::Expr>) -> ast::Node<ast::ConstraintItem> {
        ast::Node {
            span: ast::Span { start: 0, end: 0 },
            node: ast::ConstraintItem {
                identifier: identifier.into(),
                expressions,
                annotations: vec![],
            },
        }
    }

    fn literal(literal: ast::BasicLiteralExpr) -> ast::BasicExpr {
        ast::BasicExpr::Literal(literal)
    }

    fn identifier(identifier: &str) -> ast::BasicExpr {
        ast::BasicExpr::Identifier(identifier.into())
    }

    fn transform_constraint(expressions: Vec<ast::Expr>) -> Result<Vec<Arg>, FznError> {
        let options = ParseOptions::default();
        let mut context = TransformationContext::new(&options);
        let _ = context.parameters.insert(
            "coefficients".into(),
            ast::ParExpr::Array(vec![
                ast::BasicLiteralExpr::Int(2),
                ast::BasicLiteralExpr::Int(3),
            ]),
        );
        create_variables::run(vec![int_var("x"), int_var("y")], &mut context)?;

        run(vec![constraint("c", expressions)], &mut context)?;

        Ok(context.model.constraints()[0].arguments().to_vec())
    }

    #[test]
    fn scalar_arguments_keep_their_kind() {
        let arguments = transform_constraint(vec![
            ast::Expr::Basic(identifier("x")),
            ast::Expr::Basic(literal(ast::BasicLiteralExpr::Int(5))),
            ast::Expr::Basic(literal(ast::BasicLiteralExpr::FloatSetBounded {
                lower_bound: 0.5,
                upper_bound: 1.5,
            })),
        ])
        .expect("valid arguments");

        assert!(matches!(
            &arguments[0],
            Arg::Int(Scalar::Variable(x)) if x.identifier().as_ref() == "x"
        ));
        assert!(matches!(arguments[1], Arg::Int(Scalar::Parameter(5))));
        assert!(matches!(arguments[2], Arg::FloatSet(_)));
    }

    #[test]
    fn array_parameter_becomes_a_parameter_array() {
        let arguments = transform_constraint(vec![ast::Expr::Basic(identifier("coefficients"))])
            .expect("valid arguments");

        let Arg::IntArray(array) = &arguments[0] else {
            panic!("expected an int array");
        };
        assert!(array.is_par_array());
        assert_eq!(array.to_par_vector().ok(), Some(vec![2, 3]));
        assert!(array.is_anonymous());
    }

    #[test]
    fn variable_elements_decide_the_array_kind() {
        let arguments = transform_constraint(vec![ast::Expr::Array(vec![
            literal(ast::BasicLiteralExpr::Int(1)),
            identifier("y"),
        ])])
        .expect("valid arguments");

        let Arg::IntArray(array) = &arguments[0] else {
            panic!("expected an int array");
        };
        assert_eq!(array.len(), 2);
        assert!(!array.is_fixed());
    }

    #[test]
    fn empty_sets_do_not_decide_the_array_kind() {
        let arguments = transform_constraint(vec![
            ast::Expr::Array(vec![
                literal(ast::BasicLiteralExpr::IntSet(vec![])),
                literal(ast::BasicLiteralExpr::FloatSetBounded {
                    lower_bound: 0.0,
                    upper_bound: 1.0,
                }),
            ]),
            ast::Expr::Array(vec![literal(ast::BasicLiteralExpr::IntSet(vec![]))]),
            ast::Expr::Array(vec![]),
        ])
        .expect("valid arguments");

        let Arg::FloatSetArray(float_sets) = &arguments[0] else {
            panic!("expected a float set array");
        };
        assert!(float_sets[0].is_empty());
        assert!(matches!(
            &arguments[1],
            Arg::SetArray(sets) if sets.to_par_vector().ok() == Some(vec![IntSet::empty()])
        ));
        assert!(matches!(&arguments[2], Arg::IntArray(ints) if ints.is_empty()));
    }

    #[test]
    fn mixed_array_is_rejected() {
        let result = transform_constraint(vec![ast::Expr::Array(vec![
            identifier("x"),
            literal(ast::BasicLiteralExpr::Bool(true)),
        ])]);

        assert!(matches!(result, Err(FznError::TypeMismatch { .. })));
    }

    #[test]
    fn undeclared_argument_is_rejected() {
        let result = transform_constraint(vec![ast::Expr::Basic(identifier("z"))]);

        assert!(matches!(
            result,
            Err(FznError::UndefinedIdentifier(identifier)) if identifier.as_ref() == "z"
        ));
    }
}
