use std::fmt::Debug;
use std::rc::Rc;

use super::annotation;
use super::annotation::Annotation;
use super::array::BoolVarArray;
use super::array::FloatVarArray;
use super::array::IntVarArray;
use super::array::SetVarArray;
use super::domain::FloatSet;
use super::domain::IntSet;
use super::Model;
use crate::FznError;

/// Marks a scalar variable for solution output.
pub(crate) const OUTPUT_VAR: &str = "output_var";
/// Marks a scalar variable as functionally defined by some constraint.
pub(crate) const IS_DEFINED_VAR: &str = "is_defined_var";

/// Operations shared by the scalar variable kinds.
pub trait ScalarVar: Debug {
    /// The type of a value in the domain of the variable.
    type Value: Clone + Debug + PartialEq;

    fn identifier(&self) -> &Rc<str>;

    fn annotations(&self) -> &[Annotation];

    /// Whether the variable carries an `output_var` annotation.
    fn is_output(&self) -> bool;

    /// Whether the variable carries an `is_defined_var` annotation.
    fn is_defined_var(&self) -> bool;

    /// The value of the variable if its domain contains exactly one value.
    fn fixed_value(&self) -> Option<Self::Value>;

    fn is_fixed(&self) -> bool {
        self.fixed_value().is_some()
    }

    /// The fixed variable owned by `model` that stands for `value`. Repeated calls with equal
    /// values return the same instance.
    fn parameter_var(model: &Model, value: &Self::Value) -> Rc<Self>
    where
        Self: Sized;
}

macro_rules! impl_common_accessors {
    () => {
        fn identifier(&self) -> &Rc<str> {
            &self.identifier
        }

        fn annotations(&self) -> &[Annotation] {
            &self.annotations
        }

        fn is_output(&self) -> bool {
            self.is_output
        }

        fn is_defined_var(&self) -> bool {
            self.is_defined_var
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolDomain {
    False,
    True,
    Unconstrained,
}

#[derive(Debug)]
pub struct BoolVar {
    identifier: Rc<str>,
    annotations: Vec<Annotation>,
    domain: BoolDomain,
    is_output: bool,
    is_defined_var: bool,
}

impl BoolVar {
    pub(crate) fn new(
        identifier: Rc<str>,
        domain: BoolDomain,
        annotations: Vec<Annotation>,
    ) -> BoolVar {
        BoolVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            domain,
        }
    }

    pub(crate) fn fixed(identifier: Rc<str>, value: bool, annotations: Vec<Annotation>) -> BoolVar {
        let domain = if value {
            BoolDomain::True
        } else {
            BoolDomain::False
        };

        BoolVar::new(identifier, domain, annotations)
    }

    pub fn domain(&self) -> BoolDomain {
        self.domain
    }

    pub fn contains(&self, value: bool) -> bool {
        match self.domain {
            BoolDomain::False => !value,
            BoolDomain::True => value,
            BoolDomain::Unconstrained => true,
        }
    }

    pub fn lower_bound(&self) -> bool {
        self.domain == BoolDomain::True
    }

    pub fn upper_bound(&self) -> bool {
        self.domain != BoolDomain::False
    }
}

impl ScalarVar for BoolVar {
    type Value = bool;

    impl_common_accessors!();

    fn fixed_value(&self) -> Option<bool> {
        match self.domain {
            BoolDomain::False => Some(false),
            BoolDomain::True => Some(true),
            BoolDomain::Unconstrained => None,
        }
    }

    fn parameter_var(model: &Model, value: &bool) -> Rc<Self> {
        model.bool_var_par(*value)
    }
}

#[derive(Debug)]
pub struct IntVar {
    identifier: Rc<str>,
    annotations: Vec<Annotation>,
    domain: IntSet,
    lower_bound: i64,
    upper_bound: i64,
    is_output: bool,
    is_defined_var: bool,
}

impl IntVar {
    /// Fails with [`FznError::EmptyDomain`] if `domain` has no elements.
    pub(crate) fn new(
        identifier: Rc<str>,
        domain: IntSet,
        annotations: Vec<Annotation>,
    ) -> Result<IntVar, FznError> {
        let (Some(lower_bound), Some(upper_bound)) = (domain.lower_bound(), domain.upper_bound())
        else {
            return Err(FznError::EmptyDomain(identifier));
        };

        Ok(IntVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            domain,
            lower_bound,
            upper_bound,
        })
    }

    pub(crate) fn fixed(identifier: Rc<str>, value: i64, annotations: Vec<Annotation>) -> IntVar {
        IntVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            domain: IntSet::singleton(value),
            lower_bound: value,
            upper_bound: value,
        }
    }

    pub fn domain(&self) -> &IntSet {
        &self.domain
    }

    pub fn lower_bound(&self) -> i64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> i64 {
        self.upper_bound
    }

    pub fn contains(&self, value: i64) -> bool {
        self.domain.contains(value)
    }

    pub fn size(&self) -> u64 {
        self.domain.size()
    }
}

impl ScalarVar for IntVar {
    type Value = i64;

    impl_common_accessors!();

    fn fixed_value(&self) -> Option<i64> {
        (self.lower_bound == self.upper_bound).then_some(self.lower_bound)
    }

    fn parameter_var(model: &Model, value: &i64) -> Rc<Self> {
        model.int_var_par(*value)
    }
}

#[derive(Debug)]
pub struct FloatVar {
    identifier: Rc<str>,
    annotations: Vec<Annotation>,
    domain: FloatSet,
    lower_bound: f64,
    upper_bound: f64,
    is_output: bool,
    is_defined_var: bool,
}

impl FloatVar {
    /// Fails with [`FznError::EmptyDomain`] if `domain` has no elements.
    pub(crate) fn new(
        identifier: Rc<str>,
        domain: FloatSet,
        annotations: Vec<Annotation>,
    ) -> Result<FloatVar, FznError> {
        let (Some(lower_bound), Some(upper_bound)) = (domain.lower_bound(), domain.upper_bound())
        else {
            return Err(FznError::EmptyDomain(identifier));
        };

        Ok(FloatVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            domain,
            lower_bound,
            upper_bound,
        })
    }

    pub(crate) fn fixed(identifier: Rc<str>, value: f64, annotations: Vec<Annotation>) -> FloatVar {
        FloatVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            domain: FloatSet::singleton(value),
            lower_bound: value,
            upper_bound: value,
        }
    }

    pub fn domain(&self) -> &FloatSet {
        &self.domain
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn contains(&self, value: f64) -> bool {
        self.domain.contains(value)
    }
}

impl ScalarVar for FloatVar {
    type Value = f64;

    impl_common_accessors!();

    fn fixed_value(&self) -> Option<f64> {
        (self.lower_bound == self.upper_bound).then_some(self.lower_bound)
    }

    fn parameter_var(model: &Model, value: &f64) -> Rc<Self> {
        model.float_var_par(*value)
    }
}

/// A set variable, described by the elements it must contain (`lower_bound`) and the elements it
/// may contain (`upper_bound`).
#[derive(Debug)]
pub struct SetVar {
    identifier: Rc<str>,
    annotations: Vec<Annotation>,
    lower_bound: IntSet,
    upper_bound: IntSet,
    is_output: bool,
    is_defined_var: bool,
}

impl SetVar {
    pub(crate) fn new(
        identifier: Rc<str>,
        upper_bound: IntSet,
        annotations: Vec<Annotation>,
    ) -> SetVar {
        SetVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            lower_bound: IntSet::empty(),
            upper_bound,
        }
    }

    pub(crate) fn fixed(
        identifier: Rc<str>,
        value: IntSet,
        annotations: Vec<Annotation>,
    ) -> SetVar {
        SetVar {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            lower_bound: value.clone(),
            upper_bound: value,
        }
    }

    /// The elements that are in every assignment of this variable.
    pub fn lower_bound(&self) -> &IntSet {
        &self.lower_bound
    }

    /// The elements that can be in an assignment of this variable.
    pub fn upper_bound(&self) -> &IntSet {
        &self.upper_bound
    }
}

impl ScalarVar for SetVar {
    type Value = IntSet;

    impl_common_accessors!();

    fn fixed_value(&self) -> Option<IntSet> {
        (self.lower_bound == self.upper_bound).then(|| self.lower_bound.clone())
    }

    fn parameter_var(model: &Model, value: &IntSet) -> Rc<Self> {
        model.set_var_par(value)
    }
}

/// A scalar variable declared equal to another variable, e.g. `var int: b = a;`.
#[derive(Debug)]
pub struct VarReference {
    identifier: Rc<str>,
    annotations: Vec<Annotation>,
    source: Var,
    is_output: bool,
    is_defined_var: bool,
}

impl VarReference {
    pub(crate) fn new(identifier: Rc<str>, source: Var, annotations: Vec<Annotation>) -> Self {
        VarReference {
            is_output: annotation::contains(&annotations, OUTPUT_VAR),
            is_defined_var: annotation::contains(&annotations, IS_DEFINED_VAR),
            identifier,
            annotations,
            source,
        }
    }

    pub fn identifier(&self) -> &Rc<str> {
        &self.identifier
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The variable this reference was declared equal to.
    pub fn source(&self) -> &Var {
        &self.source
    }

    /// Follow chains of references to the variable that is not itself a reference.
    pub fn target(&self) -> &Var {
        match &self.source {
            Var::Reference(reference) => reference.target(),
            var => var,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.source.is_fixed()
    }

    pub fn is_output(&self) -> bool {
        self.is_output
    }

    pub fn is_defined_var(&self) -> bool {
        self.is_defined_var
    }
}

/// Any variable that can be declared in a model.
#[derive(Clone, Debug)]
pub enum Var {
    Bool(Rc<BoolVar>),
    Int(Rc<IntVar>),
    Float(Rc<FloatVar>),
    Set(Rc<SetVar>),
    BoolArray(Rc<BoolVarArray>),
    IntArray(Rc<IntVarArray>),
    FloatArray(Rc<FloatVarArray>),
    SetArray(Rc<SetVarArray>),
    Reference(Rc<VarReference>),
}

impl Var {
    pub fn identifier(&self) -> &Rc<str> {
        match self {
            Var::Bool(var) => var.identifier(),
            Var::Int(var) => var.identifier(),
            Var::Float(var) => var.identifier(),
            Var::Set(var) => var.identifier(),
            Var::BoolArray(array) => array.identifier(),
            Var::IntArray(array) => array.identifier(),
            Var::FloatArray(array) => array.identifier(),
            Var::SetArray(array) => array.identifier(),
            Var::Reference(reference) => reference.identifier(),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Var::Bool(var) => var.annotations(),
            Var::Int(var) => var.annotations(),
            Var::Float(var) => var.annotations(),
            Var::Set(var) => var.annotations(),
            Var::BoolArray(array) => array.annotations(),
            Var::IntArray(array) => array.annotations(),
            Var::FloatArray(array) => array.annotations(),
            Var::SetArray(array) => array.annotations(),
            Var::Reference(reference) => reference.annotations(),
        }
    }

    /// For scalars, whether the domain has one value. For arrays, whether every element is a
    /// parameter or a fixed variable. For references, whether the source is fixed.
    pub fn is_fixed(&self) -> bool {
        match self {
            Var::Bool(var) => var.is_fixed(),
            Var::Int(var) => var.is_fixed(),
            Var::Float(var) => var.is_fixed(),
            Var::Set(var) => var.is_fixed(),
            Var::BoolArray(array) => array.is_fixed(),
            Var::IntArray(array) => array.is_fixed(),
            Var::FloatArray(array) => array.is_fixed(),
            Var::SetArray(array) => array.is_fixed(),
            Var::Reference(reference) => reference.is_fixed(),
        }
    }

    pub fn is_output(&self) -> bool {
        match self {
            Var::Bool(var) => var.is_output(),
            Var::Int(var) => var.is_output(),
            Var::Float(var) => var.is_output(),
            Var::Set(var) => var.is_output(),
            Var::BoolArray(array) => array.is_output(),
            Var::IntArray(array) => array.is_output(),
            Var::FloatArray(array) => array.is_output(),
            Var::SetArray(array) => array.is_output(),
            Var::Reference(reference) => reference.is_output(),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Var::BoolArray(_) | Var::IntArray(_) | Var::FloatArray(_) | Var::SetArray(_)
        )
    }

    /// Resolve references to the variable they alias; other variables are returned as-is.
    pub fn resolve(&self) -> &Var {
        match self {
            Var::Reference(reference) => reference.target(),
            var => var,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Var::Bool(_) => "var bool",
            Var::Int(_) => "var int",
            Var::Float(_) => "var float",
            Var::Set(_) => "var set of int",
            Var::BoolArray(_) => "array of var bool",
            Var::IntArray(_) => "array of var int",
            Var::FloatArray(_) => "array of var float",
            Var::SetArray(_) => "array of var set of int",
            Var::Reference(reference) => reference.target().kind_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_domain_determines_bounds() {
        let unconstrained = BoolVar::new("b".into(), BoolDomain::Unconstrained, vec![]);
        let fixed = BoolVar::fixed("t".into(), true, vec![]);

        assert!(!unconstrained.is_fixed());
        assert!(!unconstrained.lower_bound());
        assert!(unconstrained.upper_bound());
        assert!(fixed.is_fixed());
        assert_eq!(fixed.fixed_value(), Some(true));
        assert!(!fixed.contains(false));
    }

    #[test]
    fn int_var_is_fixed_iff_domain_has_one_value() {
        let fixed = IntVar::new("x".into(), IntSet::from_elements([4]), vec![]).expect("non-empty");
        let free = IntVar::new(
            "y".into(),
            IntSet::interval(i64::MIN, i64::MAX).expect("valid interval"),
            vec![],
        )
        .expect("non-empty");

        assert!(fixed.is_fixed());
        assert_eq!(fixed.fixed_value(), Some(4));
        assert!(!free.is_fixed());
        assert_eq!(free.lower_bound(), i64::MIN);
    }

    #[test]
    fn int_var_with_empty_domain_is_rejected() {
        let result = IntVar::new("x".into(), IntSet::empty(), vec![]);

        assert!(matches!(
            result,
            Err(FznError::EmptyDomain(identifier)) if identifier.as_ref() == "x"
        ));
    }

    #[test]
    fn output_and_defined_var_annotations_are_interpreted() {
        let annotations = vec![
            Annotation {
                identifier: "output_var".into(),
                expressions: vec![],
            },
            Annotation {
                identifier: "is_defined_var".into(),
                expressions: vec![],
            },
        ];

        let var = BoolVar::new("b".into(), BoolDomain::Unconstrained, annotations);

        assert!(var.is_output());
        assert!(var.is_defined_var());
    }

    #[test]
    fn set_var_is_fixed_when_bounds_coincide() {
        let declared = SetVar::new(
            "s".into(),
            IntSet::interval(1, 3).expect("valid interval"),
            vec![],
        );
        let fixed = SetVar::fixed("t".into(), IntSet::from_elements([1, 2]), vec![]);

        assert!(!declared.is_fixed());
        assert!(declared.lower_bound().is_empty());
        assert_eq!(fixed.fixed_value(), Some(IntSet::from_elements([2, 1])));
    }

    #[test]
    fn reference_follows_its_source() {
        let a = Var::Int(Rc::new(
            IntVar::new(
                "a".into(),
                IntSet::interval(1, 5).expect("valid interval"),
                vec![],
            )
            .expect("non-empty"),
        ));
        let b = Var::Reference(Rc::new(VarReference::new("b".into(), a.clone(), vec![])));
        let c = VarReference::new("c".into(), b.clone(), vec![]);

        assert_eq!(b.is_fixed(), a.is_fixed());
        assert_eq!(c.target().identifier().as_ref(), "a");
        assert_eq!(b.resolve().identifier().as_ref(), "a");
        assert!(!b.is_array());
    }
}
