use std::rc::Rc;

use super::domain::FloatSet;
use super::domain::IntSet;

/// An annotation such as `output_array([1..3])` or `int_search(xs, input_order, indomain_min)`.
///
/// Annotations keep their full structure: every argument is a group of expressions. A bare
/// argument is a group of length one; a bracketed list is one group.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub identifier: Rc<str>,
    pub expressions: Vec<Vec<AnnotationExpression>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationExpression {
    Bool(bool),
    Int(i64),
    Float(f64),
    IntSet(IntSet),
    FloatSet(FloatSet),
    /// A string literal, without the surrounding quotes.
    String(Rc<str>),
    /// A nested annotation. Plain identifiers, e.g. variable names, are nested annotations
    /// without arguments.
    Annotation(Annotation),
}

impl Annotation {
    pub fn has_identifier(&self, identifier: &str) -> bool {
        self.identifier.as_ref() == identifier
    }

    /// If this annotation has no arguments, it is used as an identifier, e.g. `x` in
    /// `defines_var(x)`.
    pub fn as_identifier(&self) -> Option<&Rc<str>> {
        self.expressions.is_empty().then_some(&self.identifier)
    }
}

impl AnnotationExpression {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            AnnotationExpression::Bool(_) => "bool",
            AnnotationExpression::Int(_) => "int",
            AnnotationExpression::Float(_) => "float",
            AnnotationExpression::IntSet(_) => "set of int",
            AnnotationExpression::FloatSet(_) => "set of float",
            AnnotationExpression::String(_) => "string",
            AnnotationExpression::Annotation(_) => "annotation",
        }
    }
}

/// Whether any annotation in the list has the given identifier.
pub(crate) fn contains(annotations: &[Annotation], identifier: &str) -> bool {
    annotations
        .iter()
        .any(|annotation| annotation.has_identifier(identifier))
}
