use std::rc::Rc;

use thiserror::Error;

/// Everything that can go wrong while turning FlatZinc text into a [`crate::Model`].
///
/// Errors are fatal: no partially built model is ever returned.
#[derive(Debug, Error)]
pub enum FznError {
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    /// The input could not be tokenized or does not follow the FlatZinc grammar.
    #[error(
        "expected {expected} but found {found} at ({span_start}, {span_end}), \
         unconsumed input: '{remainder}'"
    )]
    Syntax {
        expected: String,
        found: String,
        span_start: usize,
        span_end: usize,
        remainder: String,
    },

    #[error("use of undefined identifier '{0}'")]
    UndefinedIdentifier(Rc<str>),

    #[error("identifier '{0}' is declared more than once")]
    DuplicateIdentifier(Rc<str>),

    #[error("'{identifier}' refers to '{referenced}', which is declared later")]
    ForwardReference {
        identifier: Rc<str>,
        referenced: Rc<str>,
    },

    #[error("'{identifier}' expects a value of type {expected}, got {actual}")]
    TypeMismatch {
        identifier: Rc<str>,
        expected: Box<str>,
        actual: Box<str>,
    },

    #[error("array '{identifier}' declares {expected} elements, got {actual}")]
    ArrayLengthMismatch {
        identifier: Rc<str>,
        expected: usize,
        actual: usize,
    },

    /// The index is 1-based, matching FlatZinc index sets.
    #[error("invalid element at index {index} of array '{identifier}': {reason}")]
    InvalidArrayElement {
        identifier: Rc<str>,
        index: usize,
        reason: Box<str>,
    },

    #[error("malformed annotation '{annotation}': {reason}")]
    MalformedAnnotation {
        annotation: Rc<str>,
        reason: Box<str>,
    },

    #[error("cannot optimise the array '{0}'")]
    ArrayObjective(Rc<str>),

    #[error("variable '{0}' has an empty domain")]
    EmptyDomain(Rc<str>),

    #[error("the interval {lower_bound}..{upper_bound} has its lower bound above its upper bound")]
    InvalidInterval {
        lower_bound: Box<str>,
        upper_bound: Box<str>,
    },

    /// A typed value was accessed through the wrong form, e.g. asking for the variable behind a
    /// parameter argument.
    #[error("expected {expected}, but the value is {actual}")]
    InvalidArgumentAccess {
        expected: &'static str,
        actual: &'static str,
    },
}

impl FznError {
    /// Build a [`FznError::Syntax`] pointing at `source[span_start..]`.
    pub(crate) fn syntax(
        source: &str,
        span_start: usize,
        span_end: usize,
        expected: String,
        found: String,
    ) -> FznError {
        let remainder = source
            .get(span_start..)
            .and_then(|rest| rest.lines().next())
            .map(|line| line.chars().take(REMAINDER_PREVIEW_LEN).collect::<String>())
            .unwrap_or_default();

        FznError::Syntax {
            expected,
            found,
            span_start,
            span_end,
            remainder,
        }
    }
}

const REMAINDER_PREVIEW_LEN: usize = 40;
