use std::rc::Rc;

use super::annotation::Annotation;
use super::annotation::AnnotationExpression;
use super::arguments::Scalar;
use super::domain::IntSet;
use super::variables::BoolVar;
use super::variables::FloatVar;
use super::variables::IntVar;
use super::variables::ScalarVar;
use super::variables::SetVar;
use super::Model;
use crate::FznError;

/// Marks an array for solution output, together with the index sets to print it with.
pub(crate) const OUTPUT_ARRAY: &str = "output_array";

pub type BoolVarArray = VarArray<BoolVar>;
pub type IntVarArray = VarArray<IntVar>;
pub type FloatVarArray = VarArray<FloatVar>;
pub type SetVarArray = VarArray<SetVar>;

/// An array whose elements are parameters or variables of one scalar kind.
///
/// Arrays written directly as constraint arguments have an empty identifier.
#[derive(Debug)]
pub struct VarArray<V: ScalarVar> {
    identifier: Rc<str>,
    annotations: Vec<Annotation>,
    elements: Vec<Scalar<V>>,
    output_index_set_sizes: Vec<i64>,
    is_output: bool,
}

impl<V: ScalarVar> VarArray<V> {
    /// Create a declared array and interpret its `output_array` annotation.
    pub(crate) fn new(
        identifier: Rc<str>,
        elements: Vec<Scalar<V>>,
        annotations: Vec<Annotation>,
    ) -> Result<Self, FznError> {
        let output_index_set_sizes = annotations
            .iter()
            .find(|annotation| annotation.has_identifier(OUTPUT_ARRAY))
            .map(parse_output_array)
            .transpose()?;

        Ok(VarArray {
            identifier,
            annotations,
            elements,
            is_output: output_index_set_sizes.is_some(),
            output_index_set_sizes: output_index_set_sizes.unwrap_or_default(),
        })
    }

    /// An array literal appearing as a constraint argument.
    pub(crate) fn anonymous(elements: Vec<Scalar<V>>) -> Self {
        VarArray {
            identifier: "".into(),
            annotations: vec![],
            elements,
            output_index_set_sizes: vec![],
            is_output: false,
        }
    }

    pub fn identifier(&self) -> &Rc<str> {
        &self.identifier
    }

    pub fn is_anonymous(&self) -> bool {
        self.identifier.is_empty()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the element at the given 0-based index.
    pub fn get(&self, index: usize) -> Option<&Scalar<V>> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scalar<V>> + '_ {
        self.elements.iter()
    }

    /// Whether every element is a parameter or a fixed variable.
    pub fn is_fixed(&self) -> bool {
        self.elements.iter().all(Scalar::is_fixed)
    }

    /// Whether every element is a parameter.
    pub fn is_par_array(&self) -> bool {
        self.elements.iter().all(Scalar::is_parameter)
    }

    /// The values of all elements. Fails if any element is an unfixed variable.
    pub fn to_par_vector(&self) -> Result<Vec<V::Value>, FznError> {
        self.elements.iter().map(Scalar::to_parameter).collect()
    }

    /// The variables of all elements, turning parameters into model-owned fixed variables.
    pub fn to_var_vector(&self, model: &Model) -> Vec<Rc<V>> {
        self.elements
            .iter()
            .map(|element| element.to_var(model))
            .collect()
    }

    /// The sizes of the index sets from the `output_array` annotation; empty if there is none.
    pub fn output_index_set_sizes(&self) -> &[i64] {
        &self.output_index_set_sizes
    }

    pub fn is_output(&self) -> bool {
        self.is_output
    }
}

impl<'a, V: ScalarVar> IntoIterator for &'a VarArray<V> {
    type Item = &'a Scalar<V>;

    type IntoIter = std::slice::Iter<'a, Scalar<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// `output_array` takes exactly one argument: a list of index sets `1..n`.
fn parse_output_array(annotation: &Annotation) -> Result<Vec<i64>, FznError> {
    let malformed = |reason: &str| FznError::MalformedAnnotation {
        annotation: Rc::clone(&annotation.identifier),
        reason: reason.into(),
    };

    let [index_sets] = annotation.expressions.as_slice() else {
        return Err(malformed("expected exactly one argument"));
    };

    index_sets
        .iter()
        .map(|expression| match expression {
            AnnotationExpression::IntSet(set) => index_set_size(set)
                .ok_or_else(|| malformed("index sets must be intervals starting at 1")),
            _ => Err(malformed("expected a list of integer sets")),
        })
        .collect()
}

fn index_set_size(set: &IntSet) -> Option<i64> {
    if set.is_interval() && set.lower_bound() == Some(1) {
        set.upper_bound()
    } else {
        None
    }
}
