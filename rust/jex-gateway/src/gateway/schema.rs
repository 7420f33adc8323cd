use jex_model::PreviewableStepParam;
use serde::{Deserialize, Serialize};

/// Body of a preview request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Previewer {
    #[serde(alias = "Params", default)]
    pub params: PreviewableStepParam,
}

/// Body of a preview response: the rendered argument string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewerReturn {
    #[serde(alias = "Params")]
    pub params: String,
}
