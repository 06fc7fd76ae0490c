#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
use fzn_model::FznError;
use fzn_model::Model;
use fzn_model::Var;

macro_rules! accept_model {
    ($name:ident) => {
        #[test]
        fn $name() {
            let model = parse_model("models", stringify!($name)).expect("valid model");
            check_model_is_consistent(&model);
        }
    };
}

macro_rules! reject_model {
    ($name:ident, $error:pat) => {
        #[test]
        fn $name() {
            let result = parse_model("invalid", stringify!($name));
            assert!(
                matches!(result, Err($error)),
                "unexpected result {result:?}"
            );
        }
    };
}

accept_model!(empty_model);
accept_model!(magic_square);
accept_model!(knapsack);
accept_model!(set_partition);
accept_model!(float_schedule);
accept_model!(search_annotations);

reject_model!(undefined_identifier, FznError::UndefinedIdentifier(_));
reject_model!(duplicate_identifier, FznError::DuplicateIdentifier(_));
reject_model!(
    array_length_mismatch,
    FznError::ArrayLengthMismatch {
        expected: 2,
        actual: 1,
        ..
    }
);
reject_model!(type_mismatch, FznError::TypeMismatch { .. });
reject_model!(forward_reference, FznError::ForwardReference { .. });
reject_model!(array_objective, FznError::ArrayObjective(_));
reject_model!(reversed_interval, FznError::InvalidInterval { .. });
reject_model!(mixed_annotation, FznError::MalformedAnnotation { .. });
reject_model!(malformed_defines_var, FznError::MalformedAnnotation { .. });
reject_model!(missing_semicolon, FznError::Syntax { .. });

fn parse_model(directory: &str, name: &str) -> Result<Model, FznError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let path = format!("{}/tests/{directory}/{name}.fzn", env!("CARGO_MANIFEST_DIR"));
    fzn_model::parse_file(path)
}

/// Everything the model points to is also registered in the model.
fn check_model_is_consistent(model: &Model) {
    for var in model.variables() {
        let registered = model.variable(var.identifier()).expect("registered variable");
        assert_eq!(registered.identifier(), var.identifier());
    }

    for constraint in model.constraints() {
        if let Some(defined) = constraint.defined_variable() {
            assert!(model.has_variable(defined.identifier()));
        }
    }

    if let Some(objective) = model.objective() {
        assert!(!objective.is_array());
        assert!(!matches!(objective, Var::Reference(_)));
        assert!(model.has_variable(objective.identifier()));
    }

    assert_eq!(
        model.has_objective(),
        model.is_optimisation_problem(),
        "only optimisation problems have an objective"
    );
}
