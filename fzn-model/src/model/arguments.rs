use std::rc::Rc;

use super::array::BoolVarArray;
use super::array::FloatVarArray;
use super::array::IntVarArray;
use super::array::SetVarArray;
use super::domain::FloatSet;
use super::domain::IntSet;
use super::variables::BoolVar;
use super::variables::FloatVar;
use super::variables::IntVar;
use super::variables::ScalarVar;
use super::variables::SetVar;
use super::Model;
use crate::FznError;

/// Either a literal value or a shared reference to a variable of the matching kind.
///
/// This is both the type of scalar constraint arguments and of array elements.
#[derive(Debug)]
pub enum Scalar<V: ScalarVar> {
    Parameter(V::Value),
    Variable(Rc<V>),
}

pub type BoolArg = Scalar<BoolVar>;
pub type IntArg = Scalar<IntVar>;
pub type FloatArg = Scalar<FloatVar>;
pub type IntSetArg = Scalar<SetVar>;

impl<V: ScalarVar> Clone for Scalar<V> {
    fn clone(&self) -> Self {
        match self {
            Scalar::Parameter(value) => Scalar::Parameter(value.clone()),
            Scalar::Variable(var) => Scalar::Variable(Rc::clone(var)),
        }
    }
}

impl<V: ScalarVar> Scalar<V> {
    pub fn is_parameter(&self) -> bool {
        matches!(self, Scalar::Parameter(_))
    }

    /// A parameter is always fixed; a variable is fixed if its domain has one value.
    pub fn is_fixed(&self) -> bool {
        match self {
            Scalar::Parameter(_) => true,
            Scalar::Variable(var) => var.is_fixed(),
        }
    }

    /// The literal value. Fails for variables, even fixed ones.
    pub fn parameter(&self) -> Result<&V::Value, FznError> {
        match self {
            Scalar::Parameter(value) => Ok(value),
            Scalar::Variable(_) => Err(FznError::InvalidArgumentAccess {
                expected: "a parameter",
                actual: "a variable",
            }),
        }
    }

    /// The referenced variable. Fails for parameters.
    pub fn var(&self) -> Result<&Rc<V>, FznError> {
        match self {
            Scalar::Parameter(_) => Err(FznError::InvalidArgumentAccess {
                expected: "a variable",
                actual: "a parameter",
            }),
            Scalar::Variable(var) => Ok(var),
        }
    }

    /// The value of a parameter or of a fixed variable.
    pub fn to_parameter(&self) -> Result<V::Value, FznError> {
        match self {
            Scalar::Parameter(value) => Ok(value.clone()),
            Scalar::Variable(var) => {
                var.fixed_value()
                    .ok_or(FznError::InvalidArgumentAccess {
                        expected: "a fixed value",
                        actual: "an unfixed variable",
                    })
            }
        }
    }

    /// The variable behind this value. Parameters are turned into fixed variables owned by
    /// `model`, and equal parameters share one instance.
    pub fn to_var(&self, model: &Model) -> Rc<V> {
        match self {
            Scalar::Parameter(value) => V::parameter_var(model, value),
            Scalar::Variable(var) => Rc::clone(var),
        }
    }
}

impl<V: ScalarVar> PartialEq for Scalar<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Parameter(a), Scalar::Parameter(b)) => a == b,
            (Scalar::Variable(a), Scalar::Variable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A resolved constraint argument.
#[derive(Clone, Debug)]
pub enum Arg {
    Bool(BoolArg),
    Int(IntArg),
    Float(FloatArg),
    IntSet(IntSetArg),
    FloatSet(FloatSet),
    BoolArray(Rc<BoolVarArray>),
    IntArray(Rc<IntVarArray>),
    FloatArray(Rc<FloatVarArray>),
    SetArray(Rc<SetVarArray>),
    FloatSetArray(Rc<[FloatSet]>),
}

impl Arg {
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Arg::BoolArray(_)
                | Arg::IntArray(_)
                | Arg::FloatArray(_)
                | Arg::SetArray(_)
                | Arg::FloatSetArray(_)
        )
    }

    /// Whether the argument contains no variables at all.
    pub fn is_parameter(&self) -> bool {
        match self {
            Arg::Bool(arg) => arg.is_parameter(),
            Arg::Int(arg) => arg.is_parameter(),
            Arg::Float(arg) => arg.is_parameter(),
            Arg::IntSet(arg) => arg.is_parameter(),
            Arg::FloatSet(_) | Arg::FloatSetArray(_) => true,
            Arg::BoolArray(array) => array.is_par_array(),
            Arg::IntArray(array) => array.is_par_array(),
            Arg::FloatArray(array) => array.is_par_array(),
            Arg::SetArray(array) => array.is_par_array(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        match self {
            Arg::Bool(arg) => arg.is_fixed(),
            Arg::Int(arg) => arg.is_fixed(),
            Arg::Float(arg) => arg.is_fixed(),
            Arg::IntSet(arg) => arg.is_fixed(),
            Arg::FloatSet(_) | Arg::FloatSetArray(_) => true,
            Arg::BoolArray(array) => array.is_fixed(),
            Arg::IntArray(array) => array.is_fixed(),
            Arg::FloatArray(array) => array.is_fixed(),
            Arg::SetArray(array) => array.is_fixed(),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Arg::Bool(_) => "bool",
            Arg::Int(_) => "int",
            Arg::Float(_) => "float",
            Arg::IntSet(_) => "set of int",
            Arg::FloatSet(_) => "set of float",
            Arg::BoolArray(_) => "array of bool",
            Arg::IntArray(_) => "array of int",
            Arg::FloatArray(_) => "array of float",
            Arg::SetArray(_) => "array of set of int",
            Arg::FloatSetArray(_) => "array of set of float",
        }
    }
}

macro_rules! impl_arg_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        impl Arg {
            /// Fails with [`FznError::InvalidArgumentAccess`] if the argument is of another kind.
            pub fn $name(&self) -> Result<&$ty, FznError> {
                match self {
                    Arg::$variant(value) => Ok(value),
                    other => Err(FznError::InvalidArgumentAccess {
                        expected: stringify!($variant),
                        actual: other.kind_name(),
                    }),
                }
            }
        }
    };
}

impl_arg_accessor!(as_bool, Bool, BoolArg);
impl_arg_accessor!(as_int, Int, IntArg);
impl_arg_accessor!(as_float, Float, FloatArg);
impl_arg_accessor!(as_int_set, IntSet, IntSetArg);
impl_arg_accessor!(as_float_set, FloatSet, FloatSet);
impl_arg_accessor!(as_bool_array, BoolArray, Rc<BoolVarArray>);
impl_arg_accessor!(as_int_array, IntArray, Rc<IntVarArray>);
impl_arg_accessor!(as_float_array, FloatArray, Rc<FloatVarArray>);
impl_arg_accessor!(as_set_array, SetArray, Rc<SetVarArray>);
impl_arg_accessor!(as_float_set_array, FloatSetArray, Rc<[FloatSet]>);

impl From<IntSet> for IntSetArg {
    fn from(value: IntSet) -> Self {
        Scalar::Parameter(value)
    }
}
