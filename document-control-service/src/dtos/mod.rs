pub mod health;
pub mod workflows;

pub use health::HealthResponse;
pub use workflows::{CancelWorkflowRequest, WorkflowListParams};
