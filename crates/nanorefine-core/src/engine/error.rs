use crate::core::calculators::CalculatorError;
use crate::core::descriptors::traits::DescriptorError;
use crate::core::graph::GraphError;
use crate::core::models::template::TemplateError;
use thiserror::Error;

/// Failures of a single batch. None of them leave a structure half-modified.
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("Structure {index} has no attached energy")]
    MissingEnergy { index: usize },

    #[error("Stage '{stage}' received no structures")]
    EmptyInput { stage: &'static str },

    #[error(
        "Energy-change distribution of {samples} samples is degenerate (standard deviation {std_dev:e})"
    )]
    DegenerateDistribution { samples: usize, std_dev: f64 },

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Energy evaluation failed for structure {index}: {source}")]
    EvaluationFailed {
        index: usize,
        #[source]
        source: CalculatorError,
    },

    #[error("Graph descriptor failed: {source}")]
    Descriptor { source: DescriptorError },
}

impl From<DescriptorError> for RefineError {
    fn from(error: DescriptorError) -> Self {
        match error {
            DescriptorError::Graph(source) => RefineError::from(source),
            source => RefineError::Descriptor { source },
        }
    }
}

impl From<GraphError> for RefineError {
    fn from(error: GraphError) -> Self {
        RefineError::PreconditionViolation(error.to_string())
    }
}

impl From<TemplateError> for RefineError {
    fn from(error: TemplateError) -> Self {
        RefineError::PreconditionViolation(error.to_string())
    }
}
