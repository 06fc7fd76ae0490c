//! Replace every `{}` literal with an explicit empty int set.
//!
//! The grammar cannot tell whether `{}` is a set of ints or a set of floats. Treating it as an
//! int set everywhere means every later pass only sees literals with a known kind. Where a float
//! set is required, an empty int set is accepted in its place.
use log::trace;

use crate::ast;

pub(crate) fn run(raw_model: &mut ast::RawModel) {
    let mut count = 0_usize;
    let mut normalize = |literal: &mut ast::BasicLiteralExpr| {
        if *literal == ast::BasicLiteralExpr::EmptySet {
            *literal = ast::BasicLiteralExpr::IntSet(vec![]);
            count += 1;
        }
    };

    for parameter in raw_model.parameters.iter_mut() {
        match &mut parameter.node.expr {
            ast::ParExpr::Basic(literal) => normalize(literal),
            ast::ParExpr::Array(literals) => literals.iter_mut().for_each(&mut normalize),
        }
    }

    for variable in raw_model.variables.iter_mut() {
        match &mut variable.node {
            ast::VarDeclItem::Basic(decl) => {
                if let Some(expr) = decl.expr.as_mut() {
                    normalize_expr(expr, &mut normalize);
                }
                normalize_annotations(&mut decl.annotations, &mut normalize);
            }
            ast::VarDeclItem::Array(decl) => {
                decl.literals
                    .iter_mut()
                    .for_each(|expr| normalize_expr(expr, &mut normalize));
                normalize_annotations(&mut decl.annotations, &mut normalize);
            }
        }
    }

    for constraint in raw_model.constraints.iter_mut() {
        for expr in constraint.node.expressions.iter_mut() {
            match expr {
                ast::Expr::Basic(expr) => normalize_expr(expr, &mut normalize),
                ast::Expr::Array(exprs) => exprs
                    .iter_mut()
                    .for_each(|expr| normalize_expr(expr, &mut normalize)),
            }
        }
        normalize_annotations(&mut constraint.node.annotations, &mut normalize);
    }

    match &mut raw_model.solve.node {
        ast::SolveItem::Satisfy { annotations } => {
            normalize_annotations(annotations, &mut normalize);
        }
        ast::SolveItem::Optimize {
            annotations, expr, ..
        } => {
            normalize_expr(expr, &mut normalize);
            normalize_annotations(annotations, &mut normalize);
        }
    }

    trace!("normalized {count} empty set literals");
}

fn normalize_expr(
    expr: &mut ast::BasicExpr,
    normalize: &mut impl FnMut(&mut ast::BasicLiteralExpr),
) {
    if let ast::BasicExpr::Literal(literal) = expr {
        normalize(literal);
    }
}

fn normalize_annotations(
    annotations: &mut [ast::Annotation],
    normalize: &mut impl FnMut(&mut ast::BasicLiteralExpr),
) {
    for annotation in annotations.iter_mut() {
        for expr in annotation.expressions.iter_mut().flatten() {
            match expr {
                ast::BasicAnnExpr::Literal(literal) => normalize(literal),
                ast::BasicAnnExpr::String(_) => {}
                ast::BasicAnnExpr::Annotation(nested) => {
                    normalize_annotations(std::slice::from_mut(nested), normalize);
                }
            }
        }
    }
}
