//! Check that variable initializers and array literals agree with the declared types.
use std::rc::Rc;

use super::context::DeclarationKind;
use super::context::ScalarKind;
use super::context::TransformationContext;
use super::value::Value;
use crate::ast;
use crate::FznError;

pub(crate) fn run(
    variables: &[ast::Node<ast::VarDeclItem>],
    context: &TransformationContext,
) -> Result<(), FznError> {
    for (position, variable) in variables.iter().enumerate() {
        match &variable.node {
            ast::VarDeclItem::Basic(decl) => {
                let Some(expr) = decl.expr.as_ref() else {
                    continue;
                };

                check_element(position, ScalarKind::of(&decl.ty), expr, context).map_err(
                    |mismatch| mismatch.into_error(&decl.identifier),
                )?;
            }

            ast::VarDeclItem::Array(decl) => {
                let expected_len = usize::try_from(decl.ty.index_set.size()).unwrap_or_default();

                if decl.literals.len() != expected_len {
                    return Err(FznError::ArrayLengthMismatch {
                        identifier: Rc::clone(&decl.identifier),
                        expected: expected_len,
                        actual: decl.literals.len(),
                    });
                }

                let kind = ScalarKind::of(&decl.ty.element);

                for (index, expr) in decl.literals.iter().enumerate() {
                    check_element(position, kind, expr, context).map_err(|mismatch| {
                        mismatch.into_element_error(&decl.identifier, index + 1)
                    })?;
                }
            }
        }
    }

    Ok(())
}

/// Why an initializer or array element was rejected.
#[derive(Debug)]
enum Mismatch {
    Kind {
        expected: ScalarKind,
        actual: &'static str,
    },
    ForwardReference(Rc<str>),
    Other(FznError),
}

impl Mismatch {
    fn into_error(self, identifier: &Rc<str>) -> FznError {
        match self {
            Mismatch::Kind { expected, actual } => FznError::TypeMismatch {
                identifier: Rc::clone(identifier),
                expected: expected.name().into(),
                actual: actual.into(),
            },
            Mismatch::ForwardReference(referenced) => FznError::ForwardReference {
                identifier: Rc::clone(identifier),
                referenced,
            },
            Mismatch::Other(error) => error,
        }
    }

    fn into_element_error(self, identifier: &Rc<str>, index: usize) -> FznError {
        match self {
            Mismatch::Kind { expected, actual } => FznError::InvalidArrayElement {
                identifier: Rc::clone(identifier),
                index,
                reason: format!("expected {}, got {actual}", expected.name()).into(),
            },
            mismatch => mismatch.into_error(identifier),
        }
    }
}

/// An element is either a literal of the expected kind, or the identifier of an earlier scalar
/// variable of the expected kind.
fn check_element(
    position: usize,
    expected: ScalarKind,
    expr: &ast::BasicExpr,
    context: &TransformationContext,
) -> Result<(), Mismatch> {
    match expr {
        ast::BasicExpr::Literal(literal) => {
            let value = Value::of(literal).map_err(Mismatch::Other)?;

            if value.scalar_kind() != Some(expected) {
                return Err(Mismatch::Kind {
                    expected,
                    actual: value.kind_name(),
                });
            }
        }

        ast::BasicExpr::Identifier(identifier) => {
            let declaration = context.declarations.get(identifier).ok_or_else(|| {
                Mismatch::Other(FznError::UndefinedIdentifier(Rc::clone(identifier)))
            })?;

            if declaration.position >= position {
                return Err(Mismatch::ForwardReference(Rc::clone(identifier)));
            }

            if declaration.kind != DeclarationKind::Scalar(expected) {
                return Err(Mismatch::Kind {
                    expected,
                    actual: declaration.kind.name(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::transformer::declare_variables;

    fn node<T>(node: T) -> ast::Node<T> {
        ast::Node {
            span: ast::Span { start: 0, end: 0 },
            node,
        }
    }

    fn scalar(
        ty: ast::BasicVarType,
        identifier: &str,
        expr: Option<ast::BasicExpr>,
    ) -> ast::Node<ast::VarDeclItem> {
        node(ast::VarDeclItem::Basic(ast::BasicVarDecl {
            ty,
            identifier: identifier.into(),
            annotations: vec![],
            expr,
        }))
    }

    fn int_array(len: i64, literals: Vec<ast::BasicExpr>) -> ast::Node<ast::VarDeclItem> {
        node(ast::VarDeclItem::Array(ast::ArrayVarDecl {
            ty: ast::ArrayVarType {
                index_set: ast::IndexSet { upper_bound: len },
                element: ast::BasicVarType::IntUnbounded,
            },
            identifier: "xs".into(),
            annotations: vec![],
            literals,
        }))
    }

    fn validate(variables: &[ast::Node<ast::VarDeclItem>]) -> Result<(), FznError> {
        let options = ParseOptions::default();
        let mut context = TransformationContext::new(&options);
        declare_variables::run(variables, &mut context)?;
        run(variables, &context)
    }

    fn identifier(identifier: &str) -> ast::BasicExpr {
        ast::BasicExpr::Identifier(identifier.into())
    }

    fn int(value: i64) -> ast::BasicExpr {
        ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(value))
    }

    #[test]
    fn consistent_declarations_are_accepted() {
        let variables = [
            scalar(ast::BasicVarType::IntUnbounded, "a", None),
            scalar(ast::BasicVarType::IntUnbounded, "b", Some(identifier("a"))),
            int_array(2, vec![identifier("b"), int(3)]),
        ];

        assert!(validate(&variables).is_ok());
    }

    #[test]
    fn initializer_of_wrong_kind_is_rejected() {
        let variables = [scalar(
            ast::BasicVarType::Bool,
            "b",
            Some(ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(1))),
        )];

        assert!(matches!(
            validate(&variables),
            Err(FznError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn reference_to_variable_of_other_kind_is_rejected() {
        let variables = [
            scalar(ast::BasicVarType::Bool, "a", None),
            scalar(ast::BasicVarType::IntUnbounded, "b", Some(identifier("a"))),
        ];

        assert!(matches!(
            validate(&variables),
            Err(FznError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn reference_to_later_variable_is_a_forward_reference() {
        let variables = [
            scalar(ast::BasicVarType::IntUnbounded, "a", Some(identifier("b"))),
            scalar(ast::BasicVarType::IntUnbounded, "b", None),
        ];

        assert!(matches!(
            validate(&variables),
            Err(FznError::ForwardReference { identifier, referenced })
                if identifier.as_ref() == "a" && referenced.as_ref() == "b"
        ));
    }

    #[test]
    fn array_length_must_match_declaration() {
        let variables = [int_array(2, vec![int(1)])];

        assert!(matches!(
            validate(&variables),
            Err(FznError::ArrayLengthMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn array_element_of_wrong_kind_reports_its_index() {
        let variables = [int_array(
            2,
            vec![
                int(1),
                ast::BasicExpr::Literal(ast::BasicLiteralExpr::Float(2.0)),
            ],
        )];

        assert!(matches!(
            validate(&variables),
            Err(FznError::InvalidArrayElement { index: 2, .. })
        ));
    }

    #[test]
    fn array_cannot_contain_an_array() {
        let variables = [
            int_array(1, vec![int(1)]),
            node(ast::VarDeclItem::Array(ast::ArrayVarDecl {
                ty: ast::ArrayVarType {
                    index_set: ast::IndexSet { upper_bound: 1 },
                    element: ast::BasicVarType::IntUnbounded,
                },
                identifier: "ys".into(),
                annotations: vec![],
                literals: vec![identifier("xs")],
            })),
        ];

        assert!(matches!(
            validate(&variables),
            Err(FznError::InvalidArrayElement { index: 1, .. })
        ));
    }
}
