//! Turns the raw syntax tree into a typed [`Model`].
//!
//! The transformation is a fixed sequence of passes over the raw model. Each pass either
//! succeeds or aborts the whole transformation; a partially built model is never returned.
mod annotations;
mod check_parameters;
mod context;
mod create_constraints;
mod create_solve_type;
mod create_variables;
mod declare_variables;
mod inline_parameters;
mod normalize_empty_sets;
mod resolve_defined_variables;
mod validate_variables;
mod value;

use context::TransformationContext;
use log::debug;

use crate::ast;
use crate::model::Model;
use crate::options::ParseOptions;
use crate::FznError;

pub(crate) fn transform(
    mut raw_model: ast::RawModel,
    options: &ParseOptions,
) -> Result<Model, FznError> {
    let mut context = TransformationContext::new(options);

    normalize_empty_sets::run(&mut raw_model);

    let ast::RawModel {
        predicates,
        parameters,
        mut variables,
        constraints,
        solve,
    } = raw_model;

    debug!("skipping {} predicate declarations", predicates.len());

    debug!("checking {} parameters", parameters.len());
    check_parameters::run(parameters, &mut context)?;

    debug!("checking {} variable declarations", variables.len());
    declare_variables::run(&variables, &mut context)?;
    inline_parameters::run(&mut variables, &context)?;
    validate_variables::run(&variables, &context)?;

    create_variables::run(variables, &mut context)?;

    debug!("resolving {} constraints", constraints.len());
    create_constraints::run(constraints, &mut context)?;
    resolve_defined_variables::run(&mut context.model)?;

    create_solve_type::run(solve, &mut context)?;

    Ok(context.model)
}
