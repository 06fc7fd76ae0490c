//! Record the position and kind of every variable declaration.
use std::rc::Rc;

use super::context::Declaration;
use super::context::TransformationContext;
use crate::ast;
use crate::FznError;

pub(crate) fn run(
    variables: &[ast::Node<ast::VarDeclItem>],
    context: &mut TransformationContext,
) -> Result<(), FznError> {
    for (position, variable) in variables.iter().enumerate() {
        let identifier = variable.node.identifier();

        if context.is_declared(identifier) {
            return Err(FznError::DuplicateIdentifier(Rc::clone(identifier)));
        }

        let _ = context.declarations.insert(
            Rc::clone(identifier),
            Declaration {
                position,
                kind: variable.node.kind(),
            },
        );
    }

    Ok(())
}
