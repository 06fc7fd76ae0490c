use std::rc::Rc;

use super::annotation::Annotation;
use super::arguments::Arg;
use super::variables::Var;

/// A constraint item, e.g. `constraint int_plus(a, b, c) :: defines_var(c);`.
#[derive(Clone, Debug)]
pub struct Constraint {
    identifier: Rc<str>,
    arguments: Vec<Arg>,
    annotations: Vec<Annotation>,
    defined_variable: Option<Var>,
}

impl Constraint {
    pub(crate) fn new(
        identifier: Rc<str>,
        arguments: Vec<Arg>,
        annotations: Vec<Annotation>,
    ) -> Self {
        Constraint {
            identifier,
            arguments,
            annotations,
            defined_variable: None,
        }
    }

    /// The name of the constraint predicate.
    pub fn identifier(&self) -> &Rc<str> {
        &self.identifier
    }

    pub fn arguments(&self) -> &[Arg] {
        &self.arguments
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The variable named by a `defines_var` annotation, if any.
    pub fn defined_variable(&self) -> Option<&Var> {
        self.defined_variable.as_ref()
    }

    pub(crate) fn set_defined_variable(&mut self, var: Var) {
        self.defined_variable = Some(var);
    }
}
