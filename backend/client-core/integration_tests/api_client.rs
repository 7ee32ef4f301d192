// Integration tests for the request pipeline against a mock server
// Covers status handling, auth header injection, body handling and the
// parse-tolerance fallback.

use crate::helpers::client_for;

use client_core::API_KEY_HEADER;
use client_core::api_client::RequestSpec;
use client_core::error::api::ApiError;

use common::RedactedSecret;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies a `204 No Content` yields `None` without a parse.
///
/// **WHY THIS MATTERS**: Deletes answer 204 with an empty body. Attempting
/// a JSON parse there would turn every successful delete into an error.
///
/// **BUG THIS CATCHES**: Would catch moving the 204 check after the body
/// read/parse.
#[tokio::test]
async fn given_204_response_when_executed_then_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/social/posts/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server.uri());
    let result = client
        .execute(RequestSpec::delete("social/posts/9"))
        .await
        .expect("204 is a success");

    assert!(result.is_none());
}

/// **VALUE**: Verifies a 404 normalizes to one `ApiError::Http` carrying
/// the payload message, the status and the full payload.
///
/// **WHY THIS MATTERS**: This is the single normalization point for every
/// caller; the message preference and typed status fields are what the UI
/// renders and branches on.
///
/// **BUG THIS CATCHES**: Would catch leaking a raw transport error or
/// dropping the payload during normalization.
#[tokio::test]
async fn given_404_with_message_when_executed_then_api_error_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server.uri());
    let error = client
        .execute(RequestSpec::get("social/posts/404"))
        .await
        .expect_err("non-2xx must fail");

    assert_eq!(error.user_message(), "Not found");
    assert_eq!(error.status_code().map(|s| s.0), Some(404));
    assert_eq!(
        error.payload(),
        Some(&json!({ "message": "Not found" })),
        "full payload stays available for caller inspection"
    );
}

/// **VALUE**: Verifies malformed 2xx bodies degrade to raw text.
///
/// **WHY THIS MATTERS**: A successful call with a body the service failed
/// to encode properly must still succeed; callers decide what to do with
/// the raw text.
///
/// **BUG THIS CATCHES**: Would catch failing the call on a parse error.
#[tokio::test]
async fn given_malformed_success_body_when_executed_then_raw_text_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server.uri());
    let result = client
        .execute(RequestSpec::get("health"))
        .await
        .expect("2xx with bad body is still a success");

    assert_eq!(result, Some(Value::String(String::from("definitely not json"))));
}

/// **VALUE**: Verifies both auth headers are injected when credentials are
/// stored.
///
/// **WHY THIS MATTERS**: Every authenticated endpoint requires the bearer
/// token and the vendor API key together; the matchers only respond when
/// both headers are present and correct.
///
/// **BUG THIS CATCHES**: Would catch dropping a header or mangling the
/// Bearer prefix.
#[tokio::test]
async fn given_stored_credentials_when_executed_then_auth_headers_injected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/social/posts"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header(API_KEY_HEADER, "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_for(&server.uri());
    use client_core::credentials::CredentialStore;
    store.set_token(Some(RedactedSecret::from("test-token")));
    store.set_api_key(Some(RedactedSecret::from("test-key")));

    client
        .execute(RequestSpec::get("social/posts"))
        .await
        .expect("matched request succeeds");
}

/// **VALUE**: Verifies absent credentials mean absent headers, not an
/// error, and that rotation applies to the very next call.
///
/// **WHY THIS MATTERS**: Login endpoints are called unauthenticated, and a
/// fresh token must take effect without rebuilding the client: the store
/// is read per call, never cached.
///
/// **BUG THIS CATCHES**: Would catch caching the credential read at
/// construction time.
#[tokio::test]
async fn given_credential_rotation_when_executed_then_next_call_sees_new_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let (client, store) = client_for(&server.uri());
    use client_core::credentials::CredentialStore;

    client
        .execute(RequestSpec::get("social/posts"))
        .await
        .expect("unauthenticated call proceeds");

    store.set_token(Some(RedactedSecret::from("rotated")));
    client
        .execute(RequestSpec::get("social/posts"))
        .await
        .expect("authenticated call proceeds");

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 2);
    assert!(
        requests[0].headers.get("authorization").is_none(),
        "no token stored, no Authorization header"
    );
    assert_eq!(
        requests[1]
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer rotated")
    );
}

/// **VALUE**: Verifies the JSON-body defaults: serialized body plus
/// `Content-Type: application/json`, without clobbering a caller override.
///
/// **WHY THIS MATTERS**: Create/update flows rely on the default; the
/// override rule keeps the client usable for the odd endpoint expecting a
/// vendor media type.
///
/// **BUG THIS CATCHES**: Would catch unconditionally setting Content-Type
/// or dropping the serialized body.
#[tokio::test]
async fn given_json_body_when_executed_then_content_type_defaults_but_yields_to_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/social/posts"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "title": "t" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": 1 } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/other"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server.uri());
    client
        .execute(RequestSpec::post("social/posts").json(json!({ "title": "t" })))
        .await
        .expect("default Content-Type applied");

    // Caller-supplied Content-Type wins.
    client
        .execute(
            RequestSpec::post("other")
                .header("Content-Type", "application/vnd.custom+json")
                .json(json!({ "title": "t" })),
        )
        .await
        .expect("custom media type accepted");

    let requests = server.received_requests().await.expect("requests recorded");
    let custom = requests.last().expect("two requests");
    assert_eq!(
        custom
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/vnd.custom+json")
    );
}

/// **VALUE**: Verifies the errors-array fallback in the normalized message.
///
/// **WHY THIS MATTERS**: Validation failures from the service arrive as an
/// `errors` array without a top-level message; users should see the first
/// item, not a generic status line.
///
/// **BUG THIS CATCHES**: Would catch only reading the top-level `message`
/// key.
#[tokio::test]
async fn given_errors_array_payload_when_executed_then_first_message_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [
                { "message": "Title is required", "code": "required", "path": "title" },
                { "message": "Second error" }
            ]
        })))
        .mount(&server)
        .await;

    let (client, _store) = client_for(&server.uri());
    let error = client
        .execute(RequestSpec::post("social/posts").json(json!({})))
        .await
        .expect_err("400 must fail");

    assert!(matches!(error, ApiError::Http { .. }));
    assert_eq!(error.user_message(), "Title is required");
}
