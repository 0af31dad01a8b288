//! Jsonnet templates to workflow definitions.
//!
//! [`TemplateEngine`] gathers templates from resolved dependencies and the project's
//! templates directory, evaluates each one with a fresh [`Evaluator`] call over a fixed
//! import search path, and records the outcome on a [`Definition`](crate::Definition).
//! It also reports the set of local files that can influence generated output.

mod engine;
mod evaluator;

pub use engine::{workflow_name, EngineError, Resolution, TemplateEngine};
pub use evaluator::{EvaluateError, Evaluator, JsonnetEvaluator};
