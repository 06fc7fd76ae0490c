//! Determine the goal of the model from the solve item.
use log::debug;
use log::warn;

use super::annotations;
use super::context::TransformationContext;
use crate::ast;
use crate::model::ProblemType;
use crate::model::SolveType;
use crate::FznError;

pub(crate) fn run(
    solve: ast::Node<ast::SolveItem>,
    context: &mut TransformationContext,
) -> Result<(), FznError> {
    let validate = context.options.validate_annotations;

    let solve_type = match solve.node {
        ast::SolveItem::Satisfy { annotations } => {
            SolveType::satisfy(annotations::convert(annotations, validate)?)
        }

        ast::SolveItem::Optimize {
            annotations,
            ty,
            expr,
        } => {
            let annotations = annotations::convert(annotations, validate)?;
            let problem_type = match ty {
                ast::OptimizationType::Minimize => ProblemType::Minimize,
                ast::OptimizationType::Maximize => ProblemType::Maximize,
            };

            match expr {
                ast::BasicExpr::Literal(literal) => {
                    warn!("objective {literal:?} is constant, solving as a satisfaction problem");
                    SolveType::satisfy(annotations)
                }

                ast::BasicExpr::Identifier(identifier)
                    if context.parameters.contains_key(&identifier) =>
                {
                    warn!(
                        "objective '{identifier}' is a parameter, solving as a satisfaction problem"
                    );
                    SolveType::satisfy(annotations)
                }

                ast::BasicExpr::Identifier(identifier) => {
                    let objective = context.model.variable(&identifier)?.resolve();

                    if objective.is_array() {
                        return Err(FznError::ArrayObjective(identifier));
                    }

                    SolveType::optimize(problem_type, objective.clone(), annotations)
                }
            }
        }
    };

    debug!("solve type is {:?}", solve_type.problem_type());
    context.model.set_solve_type(solve_type);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::transformer::create_variables;

    fn solve(node: ast::SolveItem) -> ast::Node<ast::SolveItem> {
        ast::Node {
            span: ast::Span { start: 0, end: 0 },
            node,
        }
    }

    fn minimize(expr: ast::BasicExpr) -> ast::Node<ast::SolveItem> {
        solve(ast::SolveItem::Optimize {
            annotations: vec![],
            ty: ast::OptimizationType::Minimize,
            expr,
        })
    }

    fn context_with_variables(options: &ParseOptions) -> TransformationContext<'_> {
        let mut context = TransformationContext::new(options);
        let _ = context.parameters.insert(
            "n".into(),
            ast::ParExpr::Basic(ast::BasicLiteralExpr::Int(3)),
        );
        create_variables::run(
            vec![
                ast::Node {
                    span: ast::Span { start: 0, end: 0 },
                    node: ast::VarDeclItem::Basic(ast::BasicVarDecl {
                        ty: ast::BasicVarType::IntUnbounded,
                        identifier: "cost".into(),
                        annotations: vec![],
                        expr: None,
                    }),
                },
                ast::Node {
                    span: ast::Span { start: 0, end: 0 },
                    node: ast::VarDeclItem::Array(ast::ArrayVarDecl {
                        ty: ast::ArrayVarType {
                            index_set: ast::IndexSet { upper_bound: 1 },
                            element: ast::BasicVarType::IntUnbounded,
                        },
                        identifier: "costs".into(),
                        annotations: vec![],
                        literals: vec![ast::BasicExpr::Identifier("cost".into())],
                    }),
                },
            ],
            &mut context,
        )
        .expect("valid variables");
        context
    }

    #[test]
    fn objective_variable_is_resolved() {
        let options = ParseOptions::default();
        let mut context = context_with_variables(&options);

        run(
            minimize(ast::BasicExpr::Identifier("cost".into())),
            &mut context,
        )
        .expect("cost is a variable");

        assert!(context.model.is_minimisation_problem());
        assert_eq!(
            context
                .model
                .objective()
                .map(|objective| objective.identifier().as_ref()),
            Some("cost")
        );
    }

    #[test]
    fn array_objective_is_rejected() {
        let options = ParseOptions::default();
        let mut context = context_with_variables(&options);

        let result = run(
            minimize(ast::BasicExpr::Identifier("costs".into())),
            &mut context,
        );

        assert!(matches!(result, Err(FznError::ArrayObjective(_))));
    }

    #[test]
    fn constant_objective_degrades_to_satisfaction() {
        let options = ParseOptions::default();
        let mut context = context_with_variables(&options);

        run(
            minimize(ast::BasicExpr::Identifier("n".into())),
            &mut context,
        )
        .expect("parameter objective");

        assert!(context.model.is_satisfaction_problem());
        assert!(!context.model.has_objective());
    }

    #[test]
    fn undeclared_objective_is_rejected() {
        let options = ParseOptions::default();
        let mut context = context_with_variables(&options);

        let result = run(
            minimize(ast::BasicExpr::Identifier("profit".into())),
            &mut context,
        );

        assert!(matches!(result, Err(FznError::UndefinedIdentifier(_))));
    }
}
