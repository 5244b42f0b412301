use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog entry. Documents refer to it by name (`type`), not by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentType {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewDocumentType {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type name is required"))]
    pub type_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DocumentTypePatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Type name cannot be empty"))]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
