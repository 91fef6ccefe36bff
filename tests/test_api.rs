//! Router-level tests: every route driven through `tower::ServiceExt::oneshot`
//! against a temp database and the template LLM provider.
//!
//! Run with:
//!   cargo test --test test_api

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
    routing::post,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

use memoir_backend::config::Config;
use memoir_backend::memoir::generator;
use memoir_backend::memoir::themes::Theme;
use memoir_backend::server::{AppState, build_router};

// ── helpers ──────────────────────────────────────────────────────────────────

struct TestApp {
    _tmp: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let config = Config::test_default(tmp.path());
        Self::with_config(tmp, config)
    }

    fn with_config(tmp: TempDir, config: Config) -> Self {
        let state = AppState::build(&config).expect("app state");
        Self { _tmp: tmp, router: build_router(state) }
    }

    async fn send(&self, req: Request<Body>) -> Response {
        self.router.clone().oneshot(req).await.expect("router is infallible")
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Save a memoir and return its id.
    async fn save(&self, title: &str, user: &str) -> String {
        let res = self
            .post_json(
                "/api/memoirs",
                json!({
                    "title": title,
                    "content": "那年夏天，我们在河边捉鱼。",
                    "theme": "童年时光",
                    "style": "warm",
                    "conversationData": [{ "role": "user", "content": "捉鱼" }],
                    "userId": user,
                }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        json_body(res).await["memoir"]["id"].as_str().unwrap().to_string()
    }
}

async fn body_bytes(res: Response) -> Vec<u8> {
    to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json_body(res: Response) -> Value {
    serde_json::from_slice(&body_bytes(res).await).expect("json body")
}

async fn text_body(res: Response) -> String {
    String::from_utf8(body_bytes(res).await).unwrap()
}

fn dialogue(answers: usize) -> Value {
    let mut msgs = Vec::new();
    for i in 0..answers {
        msgs.push(json!({ "role": "assistant", "content": format!("问题{i}") }));
        msgs.push(json!({ "role": "user", "content": format!("回答{i}") }));
    }
    Value::Array(msgs)
}

// ── health / misc ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_running() {
    let app = TestApp::new();
    let res = app.get("/").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["status"], "running");
    assert_eq!(body["llm"], "template");
    assert_eq!(body["tts"], false);
    assert_eq!(body["memoirs"], 0);
    assert!(body["message"].as_str().unwrap().contains("时光留声"));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new();
    let res = app.get("/nope").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let app = TestApp::new();
    for res in [app.get("/").await, app.get("/nope").await] {
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }
}

#[tokio::test]
async fn preflight_is_ok() {
    let app = TestApp::new();
    let res = app
        .send(Request::builder().method(Method::OPTIONS).uri("/api/chat").body(Body::empty()).unwrap())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let headers = res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
    assert!(headers.contains("Content-Type"));
}

// ── /api/chat ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_without_messages_is_400() {
    let app = TestApp::new();
    for body in [json!({ "type": "question" }), json!({ "messages": "hi", "type": "question" })] {
        let res = app.post_json("/api/chat", body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "Messages array is required");
    }
}

#[tokio::test]
async fn malformed_json_is_json_400() {
    let app = TestApp::new();
    let res = app
        .send(
            Request::post("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["error"].is_string());
}

#[tokio::test]
async fn chat_question_follows_theme() {
    let app = TestApp::new();
    let res = app
        .post_json("/api/chat", json!({ "messages": [], "type": "question", "theme": "求学之路" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["next_question"], generator::opening_question("求学之路"));

    let res = app
        .post_json("/api/chat", json!({ "messages": dialogue(1), "type": "question", "theme": "求学之路" }))
        .await;
    assert_eq!(json_body(res).await["next_question"], Theme::lookup("求学之路").questions[1]);
}

#[tokio::test]
async fn chat_unknown_theme_falls_back() {
    let app = TestApp::new();
    let res = app
        .post_json("/api/chat", json!({ "messages": [], "type": "question", "theme": "火星生活" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["next_question"], generator::opening_question("童年时光"));
}

#[tokio::test]
async fn chat_memoir_returns_title_and_content() {
    let app = TestApp::new();
    let messages = json!([
        { "role": "assistant", "content": "您小时候住在哪里？" },
        { "role": "user", "content": "我小时候住在北京的胡同里" },
    ]);
    let res = app
        .post_json(
            "/api/chat",
            json!({ "messages": messages, "type": "memoir", "theme": "童年时光", "style": "poetic" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert!(!body["title"].as_str().unwrap().is_empty());
    let content = body["content"].as_str().unwrap();
    assert!(content.contains("我小时候住在北京的胡同里"));
    assert!(!content.contains("您小时候住在哪里"));
}

#[tokio::test]
async fn chat_other_type_returns_content() {
    let app = TestApp::new();
    let res = app.post_json("/api/chat", json!({ "messages": dialogue(2) })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert!(body["content"].is_string());
    assert!(body.get("next_question").is_none());
}

// ── vendor LLM ────────────────────────────────────────────────────────────────

async fn spawn_vendor(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1/chat/completions")
}

fn vendor_app(url: String) -> TestApp {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::test_default(tmp.path());
    config.llm.provider = "openai".into();
    config.llm.openai.api_base_url = url;
    config.llm.openai.timeout_seconds = 5;
    config.llm_api_key = Some("sk-test".into());
    TestApp::with_config(tmp, config)
}

#[tokio::test]
async fn vendor_memoir_reply_is_split_into_title_and_body() {
    let vendor = Router::new().route(
        "/v1/chat/completions",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "moonshot-v1-8k");
            Json(json!({ "choices": [{ "message": { "content": "# 胡同记忆\n那是一段温暖的岁月。" } }] }))
        }),
    );
    let app = vendor_app(spawn_vendor(vendor).await);
    assert_eq!(json_body(app.get("/").await).await["llm"], "openai");

    let res = app.post_json("/api/chat", json!({ "messages": dialogue(3), "type": "memoir" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["title"], "胡同记忆");
    assert_eq!(body["content"], "那是一段温暖的岁月。");
}

#[tokio::test]
async fn vendor_failure_is_json_500() {
    let vendor = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let app = vendor_app(spawn_vendor(vendor).await);
    let res = app.post_json("/api/chat", json!({ "messages": [], "type": "question" })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(res).await["error"], "LLM service error");
}

// ── /api/tts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tts_requires_text() {
    let app = TestApp::new();
    for body in [json!({}), json!({ "text": "   " })] {
        let res = app.post_json("/api/tts", body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "Text is required");
    }
}

#[tokio::test]
async fn tts_without_credentials_is_500_without_audio() {
    let app = TestApp::new();
    let res = app.post_json("/api/tts", json!({ "text": "你好" })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(json_body(res).await, json!({ "error": "TTS service not configured" }));
}

// ── progress / styles ─────────────────────────────────────────────────────────

#[tokio::test]
async fn question_progress_counts_user_answers() {
    let app = TestApp::new();
    let res = app
        .post_json("/api/question-progress", json!({ "messages": dialogue(5), "theme": "童年时光" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["currentCount"], 5);
    assert_eq!(body["maxQuestions"], 8);
    assert_eq!(body["canGenerateMemoir"], true);
    assert_eq!(body["isComplete"], false);
}

#[tokio::test]
async fn question_progress_ignores_unknown_roles() {
    let app = TestApp::new();
    let res = app
        .post_json(
            "/api/question-progress",
            json!({ "messages": [{ "role": "tool", "content": "x" }, {}], "theme": "童年时光" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["currentCount"], 0);
}

#[tokio::test]
async fn writing_styles_catalog() {
    let app = TestApp::new();
    let body = json_body(app.get("/api/writing-styles").await).await;
    for key in ["warm", "vivid", "poetic", "simple"] {
        assert!(body[key]["name"].is_string(), "missing style {key}");
    }
}

// ── /api/memoirs ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_returns_201_with_share_url() {
    let app = TestApp::new();
    let res = app
        .post_json(
            "/api/memoirs",
            json!({ "title": "胡同", "content": "春眠不觉晓", "theme": "童年时光", "style": "warm" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    let id = body["memoir"]["id"].as_str().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["memoir"]["word_count"], 5);
    assert_eq!(body["memoir"]["user_id"], "anonymous");
    assert_eq!(body["shareUrl"], format!("http://localhost:3000/memoir/{id}"));
}

#[tokio::test]
async fn save_missing_field_is_400_and_writes_nothing() {
    let app = TestApp::new();
    let res = app
        .post_json("/api/memoirs", json!({ "title": "胡同", "content": "内容", "theme": "童年时光" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["error"].as_str().unwrap().contains("style"));

    let list = json_body(app.get("/api/memoirs?userId=anonymous").await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn get_increments_views_per_read() {
    let app = TestApp::new();
    let id = app.save("胡同", "u1").await;
    assert_eq!(json_body(app.get("/").await).await["memoirs"], 1);

    for expected in 1..=3 {
        let res = app.get(&format!("/api/memoirs/{id}")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["views"], expected);
        assert_eq!(body["conversation_data"][0]["content"], "捉鱼");
    }
}

#[tokio::test]
async fn get_unknown_is_404() {
    let app = TestApp::new();
    let res = app.get("/api/memoirs/does-not-exist").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await["error"], "Memoir not found");
}

#[tokio::test]
async fn list_by_user_newest_first() {
    let app = TestApp::new();
    app.save("一", "alice").await;
    app.save("其他", "bob").await;
    app.save("二", "alice").await;

    let list = json_body(app.get("/api/memoirs?userId=alice").await).await;
    let titles: Vec<&str> = list.as_array().unwrap().iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["二", "一"]);
    assert!(list[0].get("content").is_none());

    let limited = json_body(app.get("/api/memoirs?userId=alice&limit=1").await).await;
    assert_eq!(limited.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_with_bad_limit_is_400() {
    let app = TestApp::new();
    let res = app.get("/api/memoirs?userId=alice&limit=lots").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["error"].is_string());
}

// ── /memoir/{id} ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn share_page_renders_escaped_and_counts_view() {
    let app = TestApp::new();
    let id = app.save("<b>胡同</b>", "u1").await;

    let res = app.get(&format!("/memoir/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    let html = text_body(res).await;
    assert!(html.contains("&lt;b&gt;胡同"));
    assert!(!html.contains("<b>胡同</b>"));
    assert!(html.contains("那年夏天，我们在河边捉鱼。"));

    let body = json_body(app.get(&format!("/api/memoirs/{id}")).await).await;
    assert_eq!(body["views"], 2);
}

#[tokio::test]
async fn share_page_unknown_is_html_404() {
    let app = TestApp::new();
    let res = app.get("/memoir/does-not-exist").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(text_body(res).await.contains("404"));
}
