//! End-to-end flows against a mocked generation service: credential
//! exchange, payload encoding on the wire, and the session-expiry
//! round trip through the auth gate.

use bidforge_core::auth::{AuthGate, MemorySessionStore, SessionStore};
use bidforge_core::{FormState, ServiceClient, TemplateRegistry, build_payload, submit};
use bidforge_core::error::Error;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC_BYTES: &[u8] = b"PK\x03\x04fake-docx-bytes";

fn authed_gate(token: &str) -> (MemorySessionStore, AuthGate) {
    let store = MemorySessionStore::new();
    store.save(token).unwrap();
    let gate = AuthGate::new(Box::new(store.clone())).unwrap();
    (store, gate)
}

#[tokio::test]
async fn test_login_posts_password_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"password": "hunter2"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "token": "tok-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri());
    let token = client.login("hunter2").await.unwrap();
    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn test_login_401_maps_to_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad password"})))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri());
    let err = client.login("wrong").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredential { .. }));
    assert_eq!(err.to_string(), "credential rejected: bad password");
}

#[tokio::test]
async fn test_login_success_false_maps_to_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri());
    let err = client.login("wrong").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredential { .. }));
}

#[tokio::test]
async fn test_generate_encodes_fields_in_template_order_with_bearer_token() {
    let server = MockServer::start().await;
    // Exact-body match doubles as the field-order assertion: any
    // reordering or omission fails to match and the request 404s.
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_string(
            "template_name=General_Conditions.docx\
             &project_name=PumpStation4\
             &completion_days=120\
             &starting_hour=07%3A30\
             &ending_hour=17%3A00",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(DOC_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let registry = TemplateRegistry::built_in();
    let template = registry.lookup("General Conditions").unwrap();
    let mut form = FormState::new();
    // Scrambled insertion order; the payload must follow the template.
    form.set_scalar("ending_hour", "17:00");
    form.set_scalar("completion_days", "120");
    form.set_scalar("project_name", "PumpStation4");
    form.set_scalar("starting_hour", "07:30");

    let client = ServiceClient::new(server.uri());
    let payload = build_payload(template, &form);
    let bytes = client.generate(&payload, Some("tok-1")).await.unwrap();
    assert_eq!(bytes, DOC_BYTES);
}

#[tokio::test]
async fn test_generate_404_maps_to_generation_failure_with_service_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Template not found"})),
        )
        .mount(&server)
        .await;

    let registry = TemplateRegistry::built_in();
    let template = registry.lookup("Summary of Work").unwrap();
    let client = ServiceClient::new(server.uri());

    let err = client
        .generate(&build_payload(template, &FormState::new()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::GenerationFailure { .. }));
    assert!(err.to_string().contains("Template not found"));
}

#[tokio::test]
async fn test_expired_session_reverts_gate_and_blocks_until_relogin() {
    let server = MockServer::start().await;
    // First generation attempt: the service says the session is stale.
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "token": "tok-2"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(DOC_BYTES))
        .mount(&server)
        .await;

    let registry = TemplateRegistry::built_in();
    let client = ServiceClient::new(server.uri());
    let form = FormState::new();
    let (store, mut gate) = authed_gate("tok-stale");

    // Expiry signal reverts the gate and clears the store.
    let err = submit(&registry, "Summary of Work", &form, &mut gate, &client, true)
        .await
        .unwrap_err();
    assert!(err.is_authorization_expired());
    assert!(!gate.is_authenticated());
    assert_eq!(store.load().unwrap(), None);

    // While unauthenticated, submission is refused before dispatch.
    let err = submit(&registry, "Summary of Work", &form, &mut gate, &client, true)
        .await
        .unwrap_err();
    assert!(err.is_authorization_expired());

    // Re-authentication unblocks generation.
    gate.login(&client, "hunter2").await.unwrap();
    let document = submit(&registry, "Summary of Work", &form, &mut gate, &client, true)
        .await
        .unwrap();
    assert_eq!(document.file_name, "Summary_of_Work.docx");
    assert_eq!(document.bytes, DOC_BYTES);

    // The blocked attempt never reached the wire: one failed generate,
    // one login, one successful generate.
    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|request| request.url.path()).collect();
    assert_eq!(paths, vec!["/generate", "/login", "/generate"]);
}

#[tokio::test]
async fn test_submit_without_token_never_dispatches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(DOC_BYTES))
        .expect(0)
        .mount(&server)
        .await;

    let registry = TemplateRegistry::built_in();
    let client = ServiceClient::new(server.uri());
    let mut gate = AuthGate::in_memory();

    let err = submit(
        &registry,
        "Invitation to Bid",
        &FormState::new(),
        &mut gate,
        &client,
        true,
    )
    .await
    .unwrap_err();
    assert!(err.is_authorization_expired());
}

#[tokio::test]
async fn test_submit_with_auth_disabled_sends_no_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(DOC_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let registry = TemplateRegistry::built_in();
    let client = ServiceClient::new(server.uri());
    let mut gate = AuthGate::in_memory();

    let document = submit(
        &registry,
        "General Conditions",
        &FormState::new(),
        &mut gate,
        &client,
        false,
    )
    .await
    .unwrap();
    assert_eq!(document.file_name, "General_Conditions.docx");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_submit_unknown_template_fails_before_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = TemplateRegistry::built_in();
    let client = ServiceClient::new(server.uri());
    let (_store, mut gate) = authed_gate("tok-1");

    let err = submit(
        &registry,
        "Addendum No. 3",
        &FormState::new(),
        &mut gate,
        &client,
        true,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::UnknownTemplate { .. }));
    // A missing template is a caller bug, not a session problem.
    assert!(gate.is_authenticated());
}
