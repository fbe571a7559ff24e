#[path = "evaluator/types.rs"]
mod types;

#[path = "evaluator/normalize.rs"]
pub mod normalize;

#[path = "evaluator/template.rs"]
mod template;

#[path = "evaluator/scoring.rs"]
mod scoring;

pub use scoring::{Evaluator, EvaluatorBuilder};
pub use template::{PromptTemplate, DEFAULT_JUDGE_PROMPT};
pub use types::{EvaluationMethod, EvaluationOutcome, TaskKind};
