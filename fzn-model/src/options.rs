/// Options that control how a FlatZinc model is checked while it is being transformed.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// If `true`, every argument group of every annotation must hold values of a single kind,
    /// e.g. `int_search([x, y], ...)` is accepted but `[x, 3]` is rejected.
    pub validate_annotations: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            validate_annotations: true,
        }
    }
}
