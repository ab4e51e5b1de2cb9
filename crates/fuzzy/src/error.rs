//! Error types surfaced by rule-table validation and evaluation.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FuzzyError {
    /// A rule references an input variable that was never declared.
    #[error("rule references unknown variable '{variable}'")]
    UnknownVariable { variable: &'static str },

    /// A rule references a linguistic level its variable does not define.
    #[error("variable '{variable}' has no level '{level}'")]
    UnknownLevel {
        variable: &'static str,
        level: &'static str,
    },

    /// A rule targets an output category the output space does not declare.
    #[error("output space has no category '{category}'")]
    UnknownCategory { category: &'static str },

    /// Evaluation was asked to run without a value for a declared variable.
    #[error("no input value supplied for variable '{variable}'")]
    MissingInput { variable: &'static str },

    /// No rule fired with non-zero strength; there is no area to defuzzify.
    #[error("no rule produced any activation for the given sample")]
    NoActivation,
}
