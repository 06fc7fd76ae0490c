//! The typed model produced from a FlatZinc file.
//!
//! Variables are shared through [`Rc`]s between the variable table of the [`Model`], the arrays
//! that contain them, and the constraint arguments that refer to them. Nothing in the model is
//! mutated after construction, except for the cache of fixed variables that stand in for
//! parameters (see [`Scalar::to_var`]).
mod annotation;
mod arguments;
mod array;
mod constraint;
mod domain;
mod solve;
mod variables;

use std::cell::RefCell;
use std::rc::Rc;

pub use annotation::Annotation;
pub use annotation::AnnotationExpression;
pub use arguments::Arg;
pub use arguments::BoolArg;
pub use arguments::FloatArg;
pub use arguments::IntArg;
pub use arguments::IntSetArg;
pub use arguments::Scalar;
pub use array::BoolVarArray;
pub use array::FloatVarArray;
pub use array::IntVarArray;
pub use array::SetVarArray;
pub use array::VarArray;
pub use constraint::Constraint;
pub use domain::FloatSet;
pub use domain::IntSet;
pub use domain::Set;
use log::trace;
pub use solve::ProblemType;
pub use solve::SolveType;
pub use variables::BoolDomain;
pub use variables::BoolVar;
pub use variables::FloatVar;
pub use variables::IntVar;
pub use variables::ScalarVar;
pub use variables::SetVar;
pub use variables::Var;
pub use variables::VarReference;

use crate::containers::HashMap;
use crate::FznError;

/// A FlatZinc model with all identifiers resolved.
#[derive(Debug, Default)]
pub struct Model {
    /// The declared variables, in declaration order.
    variables: Vec<Var>,
    /// Maps identifiers to indices into `variables`.
    index: HashMap<Rc<str>, usize>,
    constraints: Vec<Constraint>,
    solve_type: SolveType,
    /// Fixed variables created for parameters, see [`Scalar::to_var`].
    parameter_variables: RefCell<ParameterVariables>,
}

#[derive(Debug, Default)]
struct ParameterVariables {
    bools: [Option<Rc<BoolVar>>; 2],
    ints: HashMap<i64, Rc<IntVar>>,
    /// Keyed by the bit pattern of the value.
    floats: HashMap<u64, Rc<FloatVar>>,
    /// Keyed by the canonical ranges of the set, so equal sets share a variable regardless of
    /// their representation.
    sets: HashMap<Vec<(i64, i64)>, Rc<SetVar>>,
}

impl Model {
    /// Register a variable. Every identifier can be registered only once.
    pub(crate) fn add_variable(&mut self, var: Var) -> Result<(), FznError> {
        let identifier = Rc::clone(var.identifier());

        if self.index.contains_key(&identifier) {
            return Err(FznError::DuplicateIdentifier(identifier));
        }

        trace!("adding variable '{identifier}'");

        let _ = self.index.insert(identifier, self.variables.len());
        self.variables.push(var);

        Ok(())
    }

    pub(crate) fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub(crate) fn constraints_mut(&mut self) -> &mut [Constraint] {
        &mut self.constraints
    }

    pub(crate) fn set_solve_type(&mut self, solve_type: SolveType) {
        self.solve_type = solve_type;
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn has_variable(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Look up a declared variable. Fails with [`FznError::UndefinedIdentifier`] if there is no
    /// variable with that identifier.
    pub fn variable(&self, identifier: &str) -> Result<&Var, FznError> {
        self.get_variable(identifier)
            .ok_or_else(|| FznError::UndefinedIdentifier(identifier.into()))
    }

    pub fn get_variable(&self, identifier: &str) -> Option<&Var> {
        self.index
            .get(identifier)
            .map(|&position| &self.variables[position])
    }

    /// The declared variables in declaration order.
    pub fn variables(&self) -> &[Var] {
        &self.variables
    }

    /// The variables and arrays annotated for output, in declaration order.
    pub fn output_variables(&self) -> impl Iterator<Item = &Var> + '_ {
        self.variables.iter().filter(|var| var.is_output())
    }

    /// The constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn solve_type(&self) -> &SolveType {
        &self.solve_type
    }

    pub fn objective(&self) -> Option<&Var> {
        self.solve_type.objective()
    }

    pub fn has_objective(&self) -> bool {
        self.objective().is_some()
    }

    pub fn is_satisfaction_problem(&self) -> bool {
        self.solve_type.problem_type() == ProblemType::Satisfy
    }

    pub fn is_optimisation_problem(&self) -> bool {
        !self.is_satisfaction_problem()
    }

    pub fn is_minimisation_problem(&self) -> bool {
        self.solve_type.problem_type() == ProblemType::Minimize
    }

    pub fn is_maximisation_problem(&self) -> bool {
        self.solve_type.problem_type() == ProblemType::Maximize
    }

    /// The fixed bool variable for `value`.
    pub fn bool_var_par(&self, value: bool) -> Rc<BoolVar> {
        let mut cache = self.parameter_variables.borrow_mut();
        let var = cache.bools[usize::from(value)].get_or_insert_with(|| {
            Rc::new(BoolVar::fixed(value.to_string().into(), value, vec![]))
        });

        Rc::clone(var)
    }

    /// The fixed int variable for `value`.
    pub fn int_var_par(&self, value: i64) -> Rc<IntVar> {
        let mut cache = self.parameter_variables.borrow_mut();
        let var = cache
            .ints
            .entry(value)
            .or_insert_with(|| Rc::new(IntVar::fixed(value.to_string().into(), value, vec![])));

        Rc::clone(var)
    }

    /// The fixed float variable for `value`.
    pub fn float_var_par(&self, value: f64) -> Rc<FloatVar> {
        let mut cache = self.parameter_variables.borrow_mut();
        let var = cache.floats.entry(value.to_bits()).or_insert_with(|| {
            Rc::new(FloatVar::fixed(format!("{value:?}").into(), value, vec![]))
        });

        Rc::clone(var)
    }

    /// The fixed set variable for `value`.
    pub fn set_var_par(&self, value: &IntSet) -> Rc<SetVar> {
        let mut cache = self.parameter_variables.borrow_mut();
        let var = cache.sets.entry(value.ranges()).or_insert_with(|| {
            Rc::new(SetVar::fixed(value.to_string().into(), value.clone(), vec![]))
        });

        Rc::clone(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_var(identifier: &str, lower_bound: i64, upper_bound: i64) -> Var {
        Var::Int(Rc::new(
            IntVar::new(
                identifier.into(),
                IntSet::interval(lower_bound, upper_bound).expect("valid interval"),
                vec![],
            )
            .expect("non-empty domain"),
        ))
    }

    #[test]
    fn variables_keep_declaration_order() {
        let mut model = Model::default();

        model.add_variable(int_var("b", 0, 1)).expect("new identifier");
        model.add_variable(int_var("a", 0, 1)).expect("new identifier");

        let identifiers = model
            .variables()
            .iter()
            .map(|var| var.identifier().as_ref())
            .collect::<Vec<_>>();

        assert_eq!(identifiers, vec!["b", "a"]);
        assert_eq!(model.num_variables(), 2);
        assert!(model.has_variable("a"));
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let mut model = Model::default();
        model.add_variable(int_var("x", 0, 1)).expect("new identifier");

        let result = model.add_variable(int_var("x", 2, 3));

        assert!(matches!(
            result,
            Err(FznError::DuplicateIdentifier(identifier)) if identifier.as_ref() == "x"
        ));
        assert_eq!(model.num_variables(), 1);
    }

    #[test]
    fn lookup_of_unknown_identifier_fails() {
        let model = Model::default();

        assert!(model.get_variable("x").is_none());
        assert!(matches!(
            model.variable("x"),
            Err(FznError::UndefinedIdentifier(_))
        ));
    }

    #[test]
    fn default_model_is_a_satisfaction_problem() {
        let model = Model::default();

        assert!(model.is_satisfaction_problem());
        assert!(!model.is_optimisation_problem());
        assert!(!model.has_objective());
        assert_eq!(model.num_constraints(), 0);
    }

    #[test]
    fn parameter_variables_are_cached_per_value() {
        let model = Model::default();

        assert!(Rc::ptr_eq(&model.bool_var_par(true), &model.bool_var_par(true)));
        assert!(!Rc::ptr_eq(&model.bool_var_par(true), &model.bool_var_par(false)));
        assert!(Rc::ptr_eq(&model.float_var_par(0.5), &model.float_var_par(0.5)));
        assert_eq!(model.int_var_par(-3).identifier().as_ref(), "-3");
        assert_eq!(model.float_var_par(2.0).identifier().as_ref(), "2.0");
        assert_eq!(model.num_variables(), 0);
    }
}
