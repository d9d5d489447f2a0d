//! Submission pipeline: assemble the generation request from the
//! registry, the form state, and the auth gate; dispatch it; hand back
//! the rendered artifact.

use std::path::{Path, PathBuf};

use bidforge_protocol::{DEFAULT_ARTIFACT_NAME, GeneratePayload};
use tracing::{info, warn};

use crate::auth::AuthGate;
use crate::client::ServiceClient;
use crate::error::{Error, Result};
use crate::form::FormState;
use crate::taxonomy::is_time_field;
use crate::templates::{TemplateDefinition, TemplateRegistry};
use crate::timefmt::to_12_hour;

/// One rendered document as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    /// Download name, from the template's declared artifact.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assemble the outgoing payload for one template.
///
/// The template-name pair goes first, then one pair per declared field
/// in declared order. Missing values read as empty strings and are sent
/// as such, never omitted; time-marked fields get the 12-hour rewrite
/// here, so form state keeps the raw 24-hour text. Templates with a
/// scope section contribute one final pair holding the joined bullet
/// block.
pub fn build_payload(template: &TemplateDefinition, form: &FormState) -> GeneratePayload {
    let mut payload = GeneratePayload::for_artifact(template.artifact);
    for field in template.fields {
        let raw = form.scalar(field);
        let value = if is_time_field(field) {
            to_12_hour(raw)
        } else {
            raw.to_string()
        };
        payload.push(*field, value);
    }
    if let Some(scope_field) = template.scope_field {
        payload.push(scope_field, form.joined_scope_items());
    }
    payload
}

/// Resolve, assemble, dispatch, and collect one generation request.
///
/// When `require_auth` is set and the gate holds no token, the request
/// is never dispatched. An authorization failure from the service
/// reverts the gate before the error is returned; the caller must
/// re-authenticate before trying again. No retries happen here.
pub async fn submit(
    registry: &TemplateRegistry,
    template_name: &str,
    form: &FormState,
    gate: &mut AuthGate,
    client: &ServiceClient,
    require_auth: bool,
) -> Result<GeneratedDocument> {
    let template = registry.lookup(template_name)?;
    let token = gate.token().map(str::to_string);

    if require_auth && token.is_none() {
        warn!(template = template.name, "no session token; refusing to dispatch");
        return Err(Error::AuthorizationExpired);
    }

    let payload = build_payload(template, form);
    info!(
        template = template.name,
        fields = payload.len(),
        "submitting generation request"
    );

    match client.generate(&payload, token.as_deref()).await {
        Ok(bytes) => {
            info!(
                template = template.name,
                bytes = bytes.len(),
                "document generated"
            );
            Ok(GeneratedDocument {
                file_name: artifact_name(template),
                bytes,
            })
        }
        Err(err) => {
            if err.is_authorization_expired() {
                warn!(template = template.name, "authorization rejected; session reverted");
                gate.invalidate();
            }
            Err(err)
        }
    }
}

/// Write the artifact under `out_dir`, creating the directory when
/// needed. Returns the path written.
pub fn save_artifact(document: &GeneratedDocument, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&document.file_name);
    std::fs::write(&path, &document.bytes)?;
    info!(path = %path.display(), bytes = document.bytes.len(), "artifact saved");
    Ok(path)
}

fn artifact_name(template: &TemplateDefinition) -> String {
    if template.artifact.is_empty() {
        DEFAULT_ARTIFACT_NAME.to_string()
    } else {
        template.artifact.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryEntry, DirectoryTable};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::built_in()
    }

    #[test]
    fn test_payload_order_matches_template_declaration() {
        let template = registry().lookup("General Conditions").unwrap();
        let mut form = FormState::new();
        // Insertion order deliberately scrambled relative to the template.
        form.set_scalar("ending_hour", "17:00");
        form.set_scalar("project_name", "Pump Station 4");
        form.set_scalar("completion_days", "120");
        form.set_scalar("starting_hour", "07:30");

        let payload = build_payload(template, &form);
        let names: Vec<&str> = payload.field_names().collect();
        assert_eq!(
            names,
            vec![
                "template_name",
                "project_name",
                "completion_days",
                "starting_hour",
                "ending_hour",
            ]
        );
        assert_eq!(payload.template_name(), Some("General_Conditions.docx"));
    }

    #[test]
    fn test_missing_fields_are_sent_as_empty_strings() {
        let template = registry().lookup("General Conditions").unwrap();
        let form = FormState::new();

        let payload = build_payload(template, &form);
        assert_eq!(payload.value("project_name"), Some(""));
        assert_eq!(payload.value("completion_days"), Some(""));
        // One pair per declared field plus the template name.
        assert_eq!(payload.len(), template.fields.len() + 1);
    }

    #[test]
    fn test_time_fields_are_rewritten_at_submission() {
        let template = registry().lookup("Invitation to Bid").unwrap();
        let mut form = FormState::new();
        form.set_scalar("time_1", "13:05");
        form.set_scalar("time_2", "09:00");
        form.set_scalar("date_1", "2026-05-01");

        let payload = build_payload(template, &form);
        assert_eq!(payload.value("time_1"), Some("1:05 PM"));
        // Engineer-section time field still gets the rewrite.
        assert_eq!(payload.value("time_2"), Some("9:00 AM"));
        // Date fields pass through untouched.
        assert_eq!(payload.value("date_1"), Some("2026-05-01"));
    }

    #[test]
    fn test_form_state_keeps_raw_time_values() {
        let template = registry().lookup("Invitation to Bid").unwrap();
        let mut form = FormState::new();
        form.set_scalar("time_1", "13:05");

        let _ = build_payload(template, &form);
        assert_eq!(form.scalar("time_1"), "13:05");
    }

    #[test]
    fn test_scope_block_is_joined_and_appended_last() {
        let template = registry().lookup("Summary of Work").unwrap();
        let mut form = FormState::new();
        for item in ["", "demo work", "  ", "more work"] {
            let index = form.scope_items().len();
            form.set_scope_item(index, item).unwrap();
        }

        let payload = build_payload(template, &form);
        assert_eq!(
            payload.value("project_scope_items"),
            Some("• demo work\n• more work")
        );
        assert_eq!(payload.field_names().last(), Some("project_scope_items"));
    }

    #[test]
    fn test_templates_without_scope_send_no_scope_pair() {
        let template = registry().lookup("Invitation to Bid").unwrap();
        let mut form = FormState::new();
        form.append_scope_item();
        form.set_scope_item(0, "stray item").unwrap();

        let payload = build_payload(template, &form);
        assert_eq!(payload.value("project_scope_items"), None);
    }

    #[test]
    fn test_directory_injection_leaves_unnamed_fields_empty_in_payload() {
        let table = DirectoryTable::with_extra(vec![
            DirectoryEntry::new("X")
                .with_override("engineer_name", "X")
                .with_override("engineer_email", "x@y.com"),
        ]);
        let template = registry().lookup("Invitation to Bid").unwrap();
        let mut form = FormState::new();
        table.apply("X", &mut form);

        let payload = build_payload(template, &form);
        assert_eq!(payload.value("engineer_name"), Some("X"));
        assert_eq!(payload.value("engineer_email"), Some("x@y.com"));
        // Present as an empty pair, not omitted.
        assert_eq!(payload.value("engineer_phone"), Some(""));
    }

    #[test]
    fn test_artifact_name_falls_back_when_empty() {
        let template = TemplateDefinition {
            name: "Nameless",
            artifact: "",
            fields: &[],
            scope_field: None,
        };
        assert_eq!(artifact_name(&template), DEFAULT_ARTIFACT_NAME);
    }

    #[test]
    fn test_save_artifact_writes_the_bytes() {
        let dir = TempDir::new().unwrap();
        let document = GeneratedDocument {
            file_name: "Summary_of_Work.docx".to_string(),
            bytes: b"PK\x03\x04fake-docx".to_vec(),
        };

        let path = save_artifact(&document, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Summary_of_Work.docx"));
        assert_eq!(std::fs::read(&path).unwrap(), document.bytes);
    }

    #[test]
    fn test_save_artifact_creates_the_output_dir() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out").join("bids");
        let document = GeneratedDocument {
            file_name: "Invitation_To_Bid.docx".to_string(),
            bytes: vec![1, 2, 3],
        };

        let path = save_artifact(&document, &out_dir).unwrap();
        assert!(path.exists());
    }
}
