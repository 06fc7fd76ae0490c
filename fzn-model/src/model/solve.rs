use super::annotation::Annotation;
use super::variables::Var;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    Satisfy,
    Minimize,
    Maximize,
}

/// The goal of the model.
#[derive(Clone, Debug)]
pub struct SolveType {
    problem_type: ProblemType,
    annotations: Vec<Annotation>,
    objective: Option<Var>,
}

impl SolveType {
    pub(crate) fn satisfy(annotations: Vec<Annotation>) -> Self {
        SolveType {
            problem_type: ProblemType::Satisfy,
            annotations,
            objective: None,
        }
    }

    pub(crate) fn optimize(
        problem_type: ProblemType,
        objective: Var,
        annotations: Vec<Annotation>,
    ) -> Self {
        SolveType {
            problem_type,
            annotations,
            objective: Some(objective),
        }
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// The search annotations on the solve item.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The variable to optimise; `None` for satisfaction problems.
    pub fn objective(&self) -> Option<&Var> {
        self.objective.as_ref()
    }
}

impl Default for SolveType {
    fn default() -> Self {
        SolveType::satisfy(vec![])
    }
}
