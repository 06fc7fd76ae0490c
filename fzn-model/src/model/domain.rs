//! Domains of integer, float and set variables.
//!
//! A set is stored either as an interval `lb..ub` or as an explicit list of values. The list
//! representation is always sorted and free of duplicates. Which representation was used is
//! observable through [`Set::is_interval`], but equality compares elements.
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::FznError;

/// A set of integers, e.g. `1..5` or `{1, 3, 5}`.
pub type IntSet = Set<i64>;

/// A set of floats, e.g. `0.5..1.5` or `{0.5, 1.5}`.
pub type FloatSet = Set<f64>;

#[derive(Clone, Debug)]
pub struct Set<E> {
    repr: Repr<E>,
}

#[derive(Clone, Debug)]
enum Repr<E> {
    Interval { lower_bound: E, upper_bound: E },
    Values(Vec<E>),
}

impl<E: Copy + PartialOrd + Debug> Set<E> {
    /// Create the interval `lower_bound..upper_bound`.
    ///
    /// Fails when `lower_bound > upper_bound`.
    pub fn interval(lower_bound: E, upper_bound: E) -> Result<Self, FznError> {
        if lower_bound <= upper_bound {
            Ok(Set {
                repr: Repr::Interval {
                    lower_bound,
                    upper_bound,
                },
            })
        } else {
            Err(FznError::InvalidInterval {
                lower_bound: format!("{lower_bound:?}").into(),
                upper_bound: format!("{upper_bound:?}").into(),
            })
        }
    }

    /// The interval containing exactly `value`.
    pub fn singleton(value: E) -> Self {
        Set {
            repr: Repr::Interval {
                lower_bound: value,
                upper_bound: value,
            },
        }
    }

    /// Create a set from an arbitrary list of values, which will be sorted and deduplicated.
    pub fn from_elements(values: impl IntoIterator<Item = E>) -> Self {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        values.dedup();

        Set {
            repr: Repr::Values(values),
        }
    }

    pub fn empty() -> Self {
        Set {
            repr: Repr::Values(Vec::new()),
        }
    }

    /// Whether this set is stored as an interval, regardless of what its elements are.
    pub fn is_interval(&self) -> bool {
        matches!(self.repr, Repr::Interval { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(&self.repr, Repr::Values(values) if values.is_empty())
    }

    /// The smallest element, or `None` for the empty set.
    pub fn lower_bound(&self) -> Option<E> {
        match &self.repr {
            Repr::Interval { lower_bound, .. } => Some(*lower_bound),
            Repr::Values(values) => values.first().copied(),
        }
    }

    /// The largest element, or `None` for the empty set.
    pub fn upper_bound(&self) -> Option<E> {
        match &self.repr {
            Repr::Interval { upper_bound, .. } => Some(*upper_bound),
            Repr::Values(values) => values.last().copied(),
        }
    }

    pub fn contains(&self, value: E) -> bool {
        match &self.repr {
            Repr::Interval {
                lower_bound,
                upper_bound,
            } => *lower_bound <= value && value <= *upper_bound,
            Repr::Values(values) => values
                .binary_search_by(|probe| probe.partial_cmp(&value).unwrap_or(Ordering::Less))
                .is_ok(),
        }
    }

    /// The explicit values of a set that is not an interval.
    pub fn values(&self) -> Option<&[E]> {
        match &self.repr {
            Repr::Interval { .. } => None,
            Repr::Values(values) => Some(values),
        }
    }
}

impl Set<i64> {
    /// The number of elements. Saturates at [`u64::MAX`].
    pub fn size(&self) -> u64 {
        match &self.repr {
            Repr::Interval {
                lower_bound,
                upper_bound,
            } => {
                let size = i128::from(*upper_bound) - i128::from(*lower_bound) + 1;
                u64::try_from(size).unwrap_or(u64::MAX)
            }
            Repr::Values(values) => values.len() as u64,
        }
    }

    /// Iterate over the elements in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        let (interval, values) = match &self.repr {
            Repr::Interval {
                lower_bound,
                upper_bound,
            } => (*lower_bound..=*upper_bound, &[][..]),
            #[allow(clippy::reversed_empty_ranges, reason = "the range is meant to be empty")]
            Repr::Values(values) => (1..=0, values.as_slice()),
        };

        interval.chain(values.iter().copied())
    }

    /// The set as a list of maximal, disjoint, increasing intervals.
    pub fn ranges(&self) -> Vec<(i64, i64)> {
        match &self.repr {
            Repr::Interval {
                lower_bound,
                upper_bound,
            } => vec![(*lower_bound, *upper_bound)],
            Repr::Values(values) => {
                let mut ranges: Vec<(i64, i64)> = Vec::new();

                for &value in values {
                    match ranges.last_mut() {
                        Some((_, end)) if end.checked_add(1) == Some(value) => *end = value,
                        _ => ranges.push((value, value)),
                    }
                }

                ranges
            }
        }
    }
}

impl PartialEq for Set<i64> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Values(a), Repr::Values(b)) => a == b,
            _ => self.ranges() == other.ranges(),
        }
    }
}

impl Eq for Set<i64> {}

impl PartialEq for Set<f64> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (
                Repr::Interval {
                    lower_bound: lb_a,
                    upper_bound: ub_a,
                },
                Repr::Interval {
                    lower_bound: lb_b,
                    upper_bound: ub_b,
                },
            ) => lb_a == lb_b && ub_a == ub_b,
            (Repr::Values(a), Repr::Values(b)) => a == b,
            (
                Repr::Interval {
                    lower_bound,
                    upper_bound,
                },
                Repr::Values(values),
            )
            | (
                Repr::Values(values),
                Repr::Interval {
                    lower_bound,
                    upper_bound,
                },
            ) => lower_bound == upper_bound && values.as_slice() == [*lower_bound],
        }
    }
}

impl Display for Set<i64> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            Repr::Interval {
                lower_bound,
                upper_bound,
            } => write!(f, "{lower_bound}..{upper_bound}"),
            Repr::Values(values) => write_values(f, values.iter().map(|value| value.to_string())),
        }
    }
}

impl Display for Set<f64> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            Repr::Interval {
                lower_bound,
                upper_bound,
            } => write!(f, "{lower_bound:?}..{upper_bound:?}"),
            Repr::Values(values) => {
                write_values(f, values.iter().map(|value| format!("{value:?}")))
            }
        }
    }
}

fn write_values(f: &mut Formatter<'_>, values: impl Iterator<Item = String>) -> std::fmt::Result {
    write!(f, "{{")?;
    for (idx, value) in values.enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    write!(f, "}}")
}
