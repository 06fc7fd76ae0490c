//! Link every constraint with a `defines_var` annotation to the variable it defines.
//!
//! This runs after all variables and constraints exist.
use std::rc::Rc;

use log::debug;

use crate::model::Annotation;
use crate::model::AnnotationExpression;
use crate::model::Model;
use crate::model::Var;
use crate::FznError;

const DEFINES_VAR: &str = "defines_var";

pub(crate) fn run(model: &mut Model) -> Result<(), FznError> {
    let defined_variables = model
        .constraints()
        .iter()
        .enumerate()
        .filter_map(|(index, constraint)| {
            constraint
                .annotations()
                .iter()
                .find(|annotation| annotation.has_identifier(DEFINES_VAR))
                .map(|annotation| (index, annotation))
        })
        .map(|(index, annotation)| {
            let identifier = defined_identifier(annotation)?;
            let var = model.variable(identifier)?.clone();
            Ok((index, var))
        })
        .collect::<Result<Vec<(usize, Var)>, FznError>>()?;

    debug!(
        "{} of {} constraints define a variable",
        defined_variables.len(),
        model.num_constraints()
    );

    let constraints = model.constraints_mut();
    for (index, var) in defined_variables {
        constraints[index].set_defined_variable(var);
    }

    Ok(())
}

/// `defines_var` has a single argument: the identifier of a variable.
fn defined_identifier(annotation: &Annotation) -> Result<&Rc<str>, FznError> {
    match annotation.expressions.as_slice() {
        [group] => match group.as_slice() {
            [AnnotationExpression::Annotation(nested)] => {
                nested
                    .as_identifier()
                    .ok_or_else(|| FznError::MalformedAnnotation {
                        annotation: Rc::clone(&annotation.identifier),
                        reason: "the argument must be a variable identifier".into(),
                    })
            }
            _ => Err(FznError::MalformedAnnotation {
                annotation: Rc::clone(&annotation.identifier),
                reason: "expected a single variable identifier".into(),
            }),
        },
        _ => Err(FznError::MalformedAnnotation {
            annotation: Rc::clone(&annotation.identifier),
            reason: "expected exactly one argument".into(),
        }),
    }
}
