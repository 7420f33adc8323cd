use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PreviewableStepParam;

/// One stage of a [crate::Job].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// How the step's tool is invoked
    #[serde(default)]
    pub config: StepConfig,

    /// Fields of the step that the gateway does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    /// A preview view over this step's parameters.
    pub fn preview(&self) -> PreviewableStepParam {
        PreviewableStepParam::from(self.config.params.clone())
    }

    /// The argument vector the backend will run this step with.
    pub fn arguments(&self) -> Vec<String> {
        self.preview().arguments()
    }
}

/// The invocation settings of a [Step].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Parameters in submission order; rendering sorts them by
    /// [StepParam::order]
    #[serde(default)]
    pub params: Vec<StepParam>,

    /// Inputs, outputs and anything else carried alongside the parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single argument descriptor. A parameter with a name and no value renders
/// as a bare flag; one with a value and no name renders as a positional
/// argument.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepParam {
    /// Identifier of the parameter in the app definition
    #[serde(default)]
    pub id: String,

    /// The flag, e.g. `-o` or `--output`
    #[serde(default)]
    pub name: String,

    /// The argument given to the flag, or the positional argument itself
    #[serde(default)]
    pub value: String,

    /// Position of the parameter on the command line
    #[serde(default)]
    pub order: i64,
}
