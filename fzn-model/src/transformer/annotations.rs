//! Convert raw annotations into model annotations.
use std::rc::Rc;

use super::value::Value;
use crate::ast;
use crate::model::Annotation;
use crate::model::AnnotationExpression;
use crate::FznError;

/// Convert `annotations`, checking that every argument group holds values of one kind if
/// `validate` is set.
pub(crate) fn convert(
    annotations: Vec<ast::Annotation>,
    validate: bool,
) -> Result<Vec<Annotation>, FznError> {
    annotations
        .into_iter()
        .map(|annotation| convert_annotation(annotation, validate))
        .collect()
}

fn convert_annotation(
    annotation: ast::Annotation,
    validate: bool,
) -> Result<Annotation, FznError> {
    let ast::Annotation {
        identifier,
        expressions,
    } = annotation;

    let expressions = expressions
        .into_iter()
        .enumerate()
        .map(|(index, group)| {
            let group = group
                .into_iter()
                .map(|expr| convert_expression(expr, validate))
                .collect::<Result<Vec<_>, _>>()?;

            if validate {
                check_homogeneous(&identifier, index + 1, &group)?;
            }

            Ok(group)
        })
        .collect::<Result<Vec<_>, FznError>>()?;

    Ok(Annotation {
        identifier,
        expressions,
    })
}

fn convert_expression(
    expr: ast::BasicAnnExpr,
    validate: bool,
) -> Result<AnnotationExpression, FznError> {
    match expr {
        ast::BasicAnnExpr::Literal(literal) => Ok(Value::of(&literal)?.into()),
        ast::BasicAnnExpr::String(string) => Ok(AnnotationExpression::String(string)),
        ast::BasicAnnExpr::Annotation(annotation) => Ok(AnnotationExpression::Annotation(
            convert_annotation(annotation, validate)?,
        )),
    }
}

fn check_homogeneous(
    identifier: &Rc<str>,
    argument: usize,
    group: &[AnnotationExpression],
) -> Result<(), FznError> {
    let Some(first) = group.first() else {
        return Ok(());
    };

    match group
        .iter()
        .find(|expr| expr.kind_name() != first.kind_name())
    {
        Some(other) => Err(FznError::MalformedAnnotation {
            annotation: Rc::clone(identifier),
            reason: format!(
                "argument {argument} mixes {} and {}",
                first.kind_name(),
                other.kind_name()
            )
            .into(),
        }),
        None => Ok(()),
    }
}
