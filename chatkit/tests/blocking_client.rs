//! Integration tests for the blocking client and its parity with async.
//!
//! Blocking calls run on `spawn_blocking` so the wiremock server keeps serving
//! on the test runtime.

use chatkit::{
    AsyncBackend, Attachment, AttachmentKind, BlockingBackend, ChatKit, Direction, Error,
    MessagePart, NewMessage, NewUser, RoomMessagesOptions,
};
use serde_json::json;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOCATOR: &str = "v1:us1:inst";
const KEY: &str = "kid:secret";
const API: &str = "/services/chatkit/v2/inst";

fn blocking(server: &MockServer) -> ChatKit<BlockingBackend> {
    ChatKit::builder()
        .instance_locator(LOCATOR)
        .key(KEY)
        .base_url(server.uri())
        .build(BlockingBackend::new())
        .unwrap()
}

async fn run<T, F>(kit: ChatKit<BlockingBackend>, f: F) -> T
where
    F: FnOnce(&ChatKit<BlockingBackend>) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&kit)).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn send_message_with_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/rooms/5/messages")))
        .and(body_json(json!({
            "sender_id": "alice",
            "text": "look",
            "attachment": {"resource_link": "https://cdn.test/cat.gif", "type": "image"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message_id": 77})))
        .expect(1)
        .mount(&server)
        .await;

    let message = NewMessage {
        sender_id: "alice".into(),
        text: "look".into(),
        attachment: Some(Attachment {
            resource_link: "https://cdn.test/cat.gif".into(),
            kind: AttachmentKind::Image,
        }),
    };
    let value = run(blocking(&server), move |kit| kit.send_message("5", &message))
        .await
        .unwrap();
    assert_eq!(value["message_id"], 77);
}

#[tokio::test(flavor = "multi_thread")]
async fn multipart_message_flattens_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/rooms/5/messages")))
        .and(body_json(json!({
            "sender_id": "alice",
            "parts": [
                {"type": "text/plain", "content": "hi"},
                {"type": "image/png", "url": "https://cdn.test/a.png"}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message_id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let parts = vec![
        MessagePart::text("hi"),
        MessagePart::url("image/png", "https://cdn.test/a.png"),
    ];
    run(blocking(&server), move |kit| {
        kit.send_multipart_message("5", "alice", &parts)
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn room_messages_query_contains_given_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/rooms/5/messages")))
        .and(query_param("initial_id", "10"))
        .and(query_param("direction", "newer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let options = RoomMessagesOptions {
        initial_id: Some(10),
        limit: None,
        direction: Some(Direction::Newer),
    };
    run(blocking(&server), move |kit| {
        kit.get_room_messages("5", &options)
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("initial_id=10&direction=newer"));
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_create_rejects_empty_batch_without_io() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = run(blocking(&server), |kit| kit.batch_create_users(&[]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_create_posts_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/batch_users")))
        .and(body_json(json!([{"id": "a", "name": "A"}, {"id": "b", "name": "B"}])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let users = vec![NewUser::new("a", "A"), NewUser::new("b", "B")];
    run(blocking(&server), move |kit| kit.batch_create_users(&users))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_all_users_stops_on_first_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "a"}, {"id": "b"}])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API}/users/a")))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API}/users/b")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = run(blocking(&server), |kit| kit.delete_all_users())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(body) if body == "denied"));
}

/// Mapped outcomes must not depend on the backend.
#[tokio::test(flavor = "multi_thread")]
async fn backends_agree_on_outcomes() {
    let cases: [(u16, &str); 7] = [
        (200, r#"{"id":"1"}"#),
        (204, ""),
        (204, "<html>oops</html>"),
        (400, "bad"),
        (401, "expired"),
        (500, "boom"),
        (200, "not json"),
    ];
    for (status, body) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;

        let sync = run(blocking(&server), |kit| kit.get_room("1")).await;
        let kit = ChatKit::builder()
            .instance_locator(LOCATOR)
            .key(KEY)
            .base_url(server.uri())
            .build(AsyncBackend::new().unwrap())
            .unwrap();
        let nonblocking = kit.get_room("1").await;

        match (sync, nonblocking) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => {
                assert_eq!(a.status(), b.status(), "status {status}");
                assert_eq!(a.body(), b.body(), "status {status}");
                assert_eq!(
                    std::mem::discriminant(&a),
                    std::mem::discriminant(&b),
                    "status {status}"
                );
            }
            (a, b) => panic!("backends disagree for {status}: {a:?} vs {b:?}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_no_content_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API}/messages/3")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let err = run(blocking(&server), |kit| kit.delete_message("3"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { status: 204, ref body, .. } if body.is_empty()));
    assert!(!err.is_retryable());
}

/// A success body above the HTTP library's default read cap still decodes.
#[tokio::test(flavor = "multi_thread")]
async fn large_success_bodies_decode_on_both_backends() {
    let blob = "x".repeat(11 * 1024 * 1024);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/rooms/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(blob)))
        .mount(&server)
        .await;

    let sync = run(blocking(&server), |kit| kit.get_room("1")).await.unwrap();
    let kit = ChatKit::builder()
        .instance_locator(LOCATOR)
        .key(KEY)
        .base_url(server.uri())
        .build(AsyncBackend::new().unwrap())
        .unwrap();
    let nonblocking = kit.get_room("1").await.unwrap();

    assert_eq!(sync.as_str().map(str::len), Some(blob.len()));
    assert_eq!(sync, nonblocking);
}
