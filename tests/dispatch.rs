//! HTTP-level tests against a mock Bot API server.

use std::io::Write;
use std::net::TcpListener;

use bot_api_client::telegram::{BotApi, ChatAction, InputFile, Params, TelegramError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "123456:TEST-token";

fn ok_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} }))
}

fn api_for(server: &MockServer) -> BotApi {
    BotApi::with_client(reqwest::Client::new(), &server.uri(), TOKEN).unwrap()
}

fn bot_path(method_name: &str) -> String {
    format!("/bot{TOKEN}/{method_name}")
}

async fn mount_ok(server: &MockServer, http_method: &str, method_name: &str) {
    Mock::given(method(http_method))
        .and(path(bot_path(method_name)))
        .respond_with(ok_response())
        .mount(server)
        .await;
}

async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

fn text_field(name: &str, value: &str) -> String {
    format!("name=\"{name}\"\r\n\r\n{value}\r\n")
}

#[tokio::test]
async fn get_me_uses_get_without_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(bot_path("getMe")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "id": 123_456, "is_bot": true, "username": "test_bot" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server).get_me().await.unwrap();
    assert_eq!(response["result"]["username"], "test_bot");

    let request = only_request(&server).await;
    assert_eq!(request.url.query(), None);
}

#[tokio::test]
async fn get_updates_drops_unset_params_from_query() {
    let server = MockServer::start().await;
    mount_ok(&server, "GET", "getUpdates").await;

    api_for(&server)
        .get_updates(Some(5), None, Some(30))
        .await
        .unwrap();

    let request = only_request(&server).await;
    let pairs: Vec<(String, String)> = request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert!(pairs.contains(&("offset".to_owned(), "5".to_owned())));
    assert!(pairs.contains(&("timeout".to_owned(), "30".to_owned())));
    assert!(pairs.iter().all(|(k, _)| k != "limit"));
}

#[tokio::test]
async fn post_endpoints_send_multipart_form() {
    let server = MockServer::start().await;
    mount_ok(&server, "POST", "sendMessage").await;

    let options = Params::new().with("parse_mode", "HTML");
    api_for(&server)
        .send_message(42_i64, "hello", Some(options))
        .await
        .unwrap();

    let body = body_text(&only_request(&server).await);
    assert!(body.to_lowercase().contains("content-disposition: form-data"));
    assert!(body.contains(&text_field("chat_id", "42")));
    assert!(body.contains(&text_field("text", "hello")));
    assert!(body.contains(&text_field("parse_mode", "HTML")));
}

#[tokio::test]
async fn every_other_endpoint_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_response())
        .expect(4)
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.set_webhook("https://example.com/hook").await.unwrap();
    api.forward_message(1_i64, "@source", 7).await.unwrap();
    api.send_chat_action(1_i64, ChatAction::Typing).await.unwrap();
    api.get_user_profile_photos(99, None, Some(1)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_owned()).collect();
    assert_eq!(
        paths,
        [
            bot_path("setWebhook"),
            bot_path("forwardMessage"),
            bot_path("sendChatAction"),
            bot_path("getUserProfilePhotos"),
        ]
    );
    assert!(body_text(&requests[1]).contains(&text_field("from_chat_id", "@source")));
    assert!(body_text(&requests[2]).contains(&text_field("action", "typing")));
}

#[tokio::test]
async fn pending_keyboard_is_attached_once() {
    let server = MockServer::start().await;
    mount_ok(&server, "POST", "sendMessage").await;

    let api = api_for(&server);
    api.set_keyboard(
        Some(vec![vec!["Yes".to_owned(), "No".to_owned()]]),
        true,
        false,
        false,
    )
    .send_message(1_i64, "first", None)
    .await
    .unwrap();
    assert!(!api.has_pending_keyboard());

    api.send_message(1_i64, "second", None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let first = body_text(&requests[0]);
    assert!(first.contains("name=\"reply_markup\""));
    assert!(first.contains(r#""keyboard":[["Yes","No"]]"#));
    assert!(first.contains(r#""resize_keyboard":true"#));

    assert!(!body_text(&requests[1]).contains("reply_markup"));
}

#[tokio::test]
async fn chat_action_leaves_pending_keyboard_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_response())
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.set_keyboard(None, false, false, true);
    api.send_chat_action(1_i64, ChatAction::UploadPhoto)
        .await
        .unwrap();
    assert!(api.has_pending_keyboard());

    api.send_location(1_i64, 51.5, -0.12, None).await.unwrap();
    assert!(!api.has_pending_keyboard());

    let requests = server.received_requests().await.unwrap();
    assert!(!body_text(&requests[0]).contains("reply_markup"));
    let location = body_text(&requests[1]);
    assert!(location.contains(r#""hide_keyboard":true"#));
    assert!(location.contains(&text_field("latitude", "51.5")));
    assert!(location.contains(&text_field("longitude", "-0.12")));
}

#[tokio::test]
async fn memory_upload_carries_file_name_and_type() {
    let server = MockServer::start().await;
    mount_ok(&server, "POST", "sendPhoto").await;

    let photo = InputFile::memory(b"\x89PNG fake".to_vec(), "/home/me/pics/photo.png");
    api_for(&server)
        .send_photo(1_i64, photo, Some(Params::new().with("caption", "look")))
        .await
        .unwrap();

    let body = body_text(&only_request(&server).await);
    let lowered = body.to_lowercase();
    assert!(body.contains("name=\"photo\"; filename=\"photo.png\""));
    assert!(!body.contains("/home/me/pics"));
    assert!(lowered.contains("content-type: image/png"));
    assert!(body.contains("PNG fake"));
    assert!(body.contains(&text_field("caption", "look")));
}

#[tokio::test]
async fn file_id_is_sent_as_plain_field() {
    let server = MockServer::start().await;
    mount_ok(&server, "POST", "sendSticker").await;

    api_for(&server)
        .send_sticker(1_i64, "AAS829_fileid", None)
        .await
        .unwrap();

    let body = body_text(&only_request(&server).await);
    assert!(body.contains(&text_field("sticker", "AAS829_fileid")));
    assert!(!body.contains("filename="));
}

#[tokio::test]
async fn local_path_is_streamed_from_disk() {
    let server = MockServer::start().await;
    mount_ok(&server, "POST", "sendDocument").await;

    let mut file = tempfile::Builder::new()
        .prefix("report")
        .suffix(".pdf")
        .tempfile()
        .unwrap();
    file.write_all(b"%PDF-1.4 test document").unwrap();
    let file_name = file.path().file_name().unwrap().to_string_lossy().into_owned();

    api_for(&server)
        .send_document(1_i64, file.path().to_string_lossy().into_owned(), None)
        .await
        .unwrap();

    let body = body_text(&only_request(&server).await);
    assert!(body.contains(&format!("filename=\"{file_name}\"")));
    assert!(body.to_lowercase().contains("content-type: application/pdf"));
    assert!(body.contains("%PDF-1.4 test document"));
}

#[tokio::test]
async fn reader_upload_uses_voice_field() {
    let server = MockServer::start().await;
    mount_ok(&server, "POST", "sendVoice").await;

    let voice = InputFile::reader(std::io::Cursor::new(b"OggS voice".to_vec()), "note.ogg");
    api_for(&server).send_voice(1_i64, voice, None).await.unwrap();

    let body = body_text(&only_request(&server).await);
    assert!(body.contains("name=\"voice\"; filename=\"note.ogg\""));
    assert!(body.to_lowercase().contains("content-type: audio/ogg"));
    assert!(body.contains("OggS voice"));
}

#[tokio::test]
async fn failure_envelope_is_returned_verbatim() {
    let server = MockServer::start().await;
    let envelope = json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: chat not found"
    });
    Mock::given(method("POST"))
        .and(path(bot_path("sendMessage")))
        .respond_with(ResponseTemplate::new(400).set_body_json(envelope.clone()))
        .mount(&server)
        .await;

    let response = api_for(&server)
        .send_message(1_i64, "hi", None)
        .await
        .unwrap();
    assert_eq!(response, envelope);
}

#[tokio::test]
async fn invalid_json_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(bot_path("getMe")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).get_me().await.unwrap_err();
    assert!(matches!(err, TelegramError::MalformedResponse(_)));
}

/// Client pointed at a local port nothing listens on.
fn unreachable_api() -> BotApi {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    BotApi::with_client(
        reqwest::Client::new(),
        &format!("http://127.0.0.1:{port}"),
        TOKEN,
    )
    .unwrap()
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let err = unreachable_api()
        .send_message(1_i64, "hi", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TelegramError::Transport(_)));
}

#[tokio::test]
async fn connection_failure_on_query_endpoint_is_a_transport_error() {
    let err = unreachable_api()
        .get_updates(None, None, Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, TelegramError::Transport(_)));
}
