use crate::dim::{DimError, DimResult, Expression, Quantity};
use crate::formula::environment::Environment;
use crate::formula::report::{ProblemOutcome, Report};
use crate::notebook::{Notebook, Problem};

/// Evaluates problems top to bottom, binding each result under its name
pub struct Evaluator {
    env: Environment,
}

impl Evaluator {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    pub fn for_notebook(notebook: &Notebook) -> Self {
        Self::new(Environment::from_notebook(notebook))
    }

    /// Evaluate one problem and convert it to its target unit.
    /// Failed problems bind nothing, so dependants fail with an unknown name.
    pub fn evaluate_problem(&mut self, problem: &Problem) -> DimResult<Quantity> {
        let value = problem.expression.evaluate(&self.env)?;
        let value = match &problem.unit {
            Some(unit) => value.convert_to(unit)?,
            None => value,
        };
        self.env.bind_result(&problem.name, value.clone());
        Ok(value)
    }

    /// Evaluate a free-standing expression against everything bound so far
    pub fn evaluate_expression(&self, input: &str) -> DimResult<Quantity> {
        Expression::parse(input)?.evaluate(&self.env)
    }

    pub fn run(&mut self, notebook: &Notebook) -> Report {
        let mut outcomes = Vec::with_capacity(notebook.problems.len());

        for problem in &notebook.problems {
            let result = self.evaluate_problem(problem);
            match &result {
                Ok(value) => log::debug!("{} = {}", problem.name, value),
                Err(e) => log::warn!(
                    "{} = {} failed: {}",
                    problem.name,
                    problem.expression.source(),
                    e
                ),
            }
            outcomes.push(ProblemOutcome {
                name: problem.name.clone(),
                title: problem.title_display().to_string(),
                pinned: problem.unit.is_some(),
                result,
            });
        }

        Report {
            title: notebook.title.clone(),
            outcomes,
        }
    }
}

/// Evaluate every problem of a notebook with a fresh environment
pub fn run_notebook(notebook: &Notebook, env: Environment) -> Report {
    Evaluator::new(env).run(notebook)
}

impl ProblemOutcome {
    pub fn error(&self) -> Option<&DimError> {
        self.result.as_ref().err()
    }
}
