use crate::pipeline::Step;
use arbor_graph::NodeIx;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge {from} -> {to} has non-positive span {span}")]
    InvalidSpan { from: String, to: String, span: i32 },

    #[error("edge {from} -> {to} spans {span} layers; normalize edges first")]
    NotNormalized { from: String, to: String, span: i32 },

    #[error("node {0} is not part of the layout graph")]
    MissingNode(NodeIx),

    #[error("layout step {step} panicked: {message}")]
    StepPanicked { step: Step, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
