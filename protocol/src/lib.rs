//! Wire types for the bidforge document-generation service.
//!
//! The service speaks two endpoints: a JSON credential exchange and a
//! URL-encoded form post that answers with the rendered document bytes.
//! The types here mirror those bodies exactly; everything higher level
//! (registries, form state, the auth gate) lives in `bidforge-core`.

use serde::{Deserialize, Serialize};

/// Form field carrying the artifact file name the service should render.
pub const TEMPLATE_NAME_FIELD: &str = "template_name";

/// Download name used when a template declares no artifact of its own.
pub const DEFAULT_ARTIFACT_NAME: &str = "customized.docx";

/// Credential exchange request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Credential exchange response body.
///
/// The service signals a rejected credential either through a non-2xx
/// status or through `success = false`; `token` is present only on
/// success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// JSON failure body the service emits on generation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Ordered field pairs for one generation request.
///
/// Order is load-bearing: the payload must carry the template-name pair
/// first and then one pair per template field in the template's declared
/// sequence. Serializes transparently as a pair list so the form encoder
/// emits it in exactly that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratePayload {
    pairs: Vec<(String, String)>,
}

impl GeneratePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a payload addressed at one template artifact.
    pub fn for_artifact(artifact: &str) -> Self {
        let mut payload = Self::new();
        payload.push(TEMPLATE_NAME_FIELD, artifact);
        payload
    }

    /// Append one field pair, preserving insertion order.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((field.into(), value.into()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Value of the first pair named `field`, if any.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// The artifact file name this payload is addressed at.
    pub fn template_name(&self) -> Option<&str> {
        self.value(TEMPLATE_NAME_FIELD)
    }

    /// Field names in payload order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(name, _)| name.as_str())
    }
}
