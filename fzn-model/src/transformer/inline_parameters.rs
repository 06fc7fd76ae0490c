//! Substitute parameter values for parameter identifiers in variable declarations.
//!
//! After this pass, every identifier in a variable initializer or array literal names a declared
//! variable.
use std::rc::Rc;

use log::trace;

use super::context::ScalarKind;
use super::context::TransformationContext;
use crate::ast;
use crate::FznError;

pub(crate) fn run(
    variables: &mut [ast::Node<ast::VarDeclItem>],
    context: &TransformationContext,
) -> Result<(), FznError> {
    let mut num_inlined = 0_usize;

    for variable in variables.iter_mut() {
        match &mut variable.node {
            ast::VarDeclItem::Basic(decl) => {
                let Some(expr) = decl.expr.as_mut() else {
                    continue;
                };

                if inline(expr, context, |_| FznError::TypeMismatch {
                    identifier: Rc::clone(&decl.identifier),
                    expected: ScalarKind::of(&decl.ty).name().into(),
                    actual: "array parameter".into(),
                })? {
                    num_inlined += 1;
                }
            }

            ast::VarDeclItem::Array(decl) => {
                for (index, expr) in decl.literals.iter_mut().enumerate() {
                    if inline(expr, context, |parameter| FznError::InvalidArrayElement {
                        identifier: Rc::clone(&decl.identifier),
                        index: index + 1,
                        reason: format!("'{parameter}' is an array parameter").into(),
                    })? {
                        num_inlined += 1;
                    }
                }
            }
        }
    }

    trace!("inlined {num_inlined} parameter references");

    Ok(())
}

/// Replace `expr` by the value of the parameter it names. Returns whether anything was replaced.
fn inline(
    expr: &mut ast::BasicExpr,
    context: &TransformationContext,
    array_parameter: impl FnOnce(&Rc<str>) -> FznError,
) -> Result<bool, FznError> {
    let ast::BasicExpr::Identifier(identifier) = expr else {
        return Ok(false);
    };

    match context.parameters.get(identifier) {
        Some(ast::ParExpr::Basic(literal)) => {
            *expr = ast::BasicExpr::Literal(literal.clone());
            Ok(true)
        }
        Some(ast::ParExpr::Array(_)) => Err(array_parameter(identifier)),
        None if context.declarations.contains_key(identifier) => Ok(false),
        None => Err(FznError::UndefinedIdentifier(Rc::clone(identifier))),
    }
}
