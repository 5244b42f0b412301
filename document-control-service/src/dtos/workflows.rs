use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowListParams {
    pub document_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct CancelWorkflowRequest {
    #[validate(length(min = 1, message = "Reason cannot be empty"))]
    pub reason: Option<String>,
}
