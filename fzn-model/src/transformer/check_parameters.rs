//! Type-check the parameter declarations and record them in the context.
use std::rc::Rc;

use log::trace;

use super::context::ScalarKind;
use super::context::TransformationContext;
use super::value::Value;
use crate::ast;
use crate::FznError;

pub(crate) fn run(
    parameters: Vec<ast::Node<ast::ParDeclItem>>,
    context: &mut TransformationContext,
) -> Result<(), FznError> {
    for parameter in parameters {
        let ast::ParDeclItem {
            ty,
            identifier,
            expr,
        } = parameter.node;

        if context.is_declared(&identifier) {
            return Err(FznError::DuplicateIdentifier(identifier));
        }

        check_type(&identifier, ty, &expr)?;

        trace!("parameter '{identifier}' has type {ty:?}");
        let _ = context.parameters.insert(identifier, expr);
    }

    Ok(())
}

fn check_type(
    identifier: &Rc<str>,
    ty: ast::ParType,
    expr: &ast::ParExpr,
) -> Result<(), FznError> {
    match (ty, expr) {
        (ast::ParType::Basic(element), ast::ParExpr::Basic(literal)) => {
            let expected = kind_of(element);
            let value = Value::of(literal)?;

            if value.scalar_kind() != Some(expected) {
                return Err(FznError::TypeMismatch {
                    identifier: Rc::clone(identifier),
                    expected: expected.name().into(),
                    actual: value.kind_name().into(),
                });
            }
        }

        (ast::ParType::Array { index_set, element }, ast::ParExpr::Array(literals)) => {
            let expected = kind_of(element);
            let expected_len = usize::try_from(index_set.size()).unwrap_or_default();

            if literals.len() != expected_len {
                return Err(FznError::ArrayLengthMismatch {
                    identifier: Rc::clone(identifier),
                    expected: expected_len,
                    actual: literals.len(),
                });
            }

            for (index, literal) in literals.iter().enumerate() {
                let value = Value::of(literal)?;

                if value.scalar_kind() != Some(expected) {
                    return Err(FznError::InvalidArrayElement {
                        identifier: Rc::clone(identifier),
                        index: index + 1,
                        reason: format!("expected {}, got {}", expected.name(), value.kind_name())
                            .into(),
                    });
                }
            }
        }

        (ast::ParType::Basic(element), ast::ParExpr::Array(_)) => {
            return Err(FznError::TypeMismatch {
                identifier: Rc::clone(identifier),
                expected: kind_of(element).name().into(),
                actual: "array".into(),
            });
        }

        (ast::ParType::Array { element, .. }, ast::ParExpr::Basic(literal)) => {
            return Err(FznError::TypeMismatch {
                identifier: Rc::clone(identifier),
                expected: format!("array of {}", kind_of(element).name()).into(),
                actual: Value::of(literal)?.kind_name().into(),
            });
        }
    }

    Ok(())
}

fn kind_of(ty: ast::BasicParType) -> ScalarKind {
    match ty {
        ast::BasicParType::Bool => ScalarKind::Bool,
        ast::BasicParType::Int => ScalarKind::Int,
        ast::BasicParType::Float => ScalarKind::Float,
        ast::BasicParType::SetOfInt => ScalarKind::Set,
    }
}
