use secrecy::SecretString;
use wellwheel_client::chat::ReqwestChatClient;
use wellwheel_client::{ChatClient, ChatRequest, ClientError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ReqwestChatClient {
    ReqwestChatClient::new(&server.uri(), SecretString::new("sk-test".into()), reqwest::Client::new())
}

#[tokio::test]
async fn completion_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 160
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Take a walk outside."}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        })))
        .mount(&server)
        .await;

    let out = client(&server)
        .complete(&ChatRequest::smart_tip("gpt-4o-mini", "Profile: {}"))
        .await
        .expect("completion");
    assert_eq!(out.as_deref(), Some("Take a walk outside."));
}

#[tokio::test]
async fn no_choices_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let out = client(&server)
        .complete(&ChatRequest::smart_tip("m", "p"))
        .await
        .expect("completion");
    assert_eq!(out, None);
}

#[tokio::test]
async fn bad_key_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete(&ChatRequest::smart_tip("m", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Auth(ref m) if m == "Incorrect API key provided"));
}
