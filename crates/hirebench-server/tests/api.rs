//! HTTP-level tests against a server bound to an ephemeral port.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hirebench_core::engine::{Evaluator, EvaluatorConfig};
use hirebench_core::traits::TextGenerator;
use hirebench_providers::gemini::GeminiClient;
use hirebench_providers::mock::MockGenerator;
use hirebench_runner::JsLoader;
use hirebench_server::{router, AppState};

fn state(generator: Option<Arc<dyn TextGenerator>>, static_dir: PathBuf) -> AppState {
    AppState {
        generator,
        evaluator: Arc::new(Evaluator::new(JsLoader::default(), EvaluatorConfig::default())),
        static_dir,
    }
}

async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn mock(reply: &str) -> Option<Arc<dyn TextGenerator>> {
    Some(Arc::new(MockGenerator::with_fixed_response(reply)))
}

#[tokio::test]
async fn health_check() {
    let base = spawn_app(state(None, PathBuf::from("."))).await;
    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn missing_key_is_500() {
    let base = spawn_app(state(None, PathBuf::from("."))).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/quiz-questions"))
        .json(&json!({"domain": "Rust"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing GEMINI_API_KEY");
}

#[tokio::test]
async fn quiz_questions_are_extracted() {
    let reply = r#"Sure! [{"text": "Q1", "options": ["a","b","c","d"], "correctAnswer": "a", "difficulty": "easy"}] Done."#;
    let base = spawn_app(state(mock(reply), PathBuf::from("."))).await;
    let body: Value = reqwest::Client::new()
        .post(format!("{base}/api/quiz-questions"))
        .json(&json!({"domain": "Rust"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["questions"][0]["text"], "Q1");
    assert_eq!(body["questions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn coding_question_takes_first_item() {
    let reply = r#"[{"id": "Q1", "functionName": "a"}, {"id": "Q2", "functionName": "b"}]"#;
    let base = spawn_app(state(mock(reply), PathBuf::from("."))).await;
    let body: Value = reqwest::Client::new()
        .post(format!("{base}/api/coding-question"))
        .json(&json!({"domain": "web"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["question"]["functionName"], "a");
}

#[tokio::test]
async fn reply_without_array_is_502() {
    let base = spawn_app(state(mock("no json here"), PathBuf::from("."))).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/coding-question"))
        .json(&json!({"domain": "web"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn bracketed_prose_before_array_is_skipped() {
    let reply = r#"Here is my [draft] answer: [{"id": "Q1", "functionName": "sum"}]"#;
    let base = spawn_app(state(mock(reply), PathBuf::from("."))).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/coding-question"))
        .json(&json!({"domain": "web"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["question"]["functionName"], "sum");
}

#[tokio::test]
async fn preflight_is_answered_for_api_routes() {
    let base = spawn_app(state(None, PathBuf::from("."))).await;
    let client = reqwest::Client::new();
    for path in ["/api/evaluate", "/api/quiz-questions", "/api/coding-question"] {
        let resp = client
            .request(reqwest::Method::OPTIONS, format!("{base}{path}"))
            .header("Origin", "http://localhost:5173")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success(), "{path}: {}", resp.status());
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(headers["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST"));
        assert!(headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .contains("content-type"));
    }
}

#[tokio::test]
async fn cors_headers_on_regular_responses() {
    let base = spawn_app(state(None, PathBuf::from("."))).await;
    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn upstream_status_is_forwarded_without_retry() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"generationConfig": {"temperature": 0.2}})))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&upstream)
        .await;

    let client = GeminiClient::new("key", Some(upstream.uri()), None, 5).unwrap();
    let base = spawn_app(state(Some(Arc::new(client)), PathBuf::from("."))).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/coding-question"))
        .json(&json!({"domain": "web"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Upstream error 503");
    upstream.verify().await;
}

#[tokio::test]
async fn evaluate_endpoint_runs_javascript() {
    let base = spawn_app(state(None, PathBuf::from("."))).await;
    let body: Value = reqwest::Client::new()
        .post(format!("{base}/api/evaluate"))
        .json(&json!({
            "source": "function add(a, b) { return a + b; }",
            "language": "javascript",
            "question": {
                "id": "Q1",
                "functionName": "add",
                "parameters": ["a", "b"],
                "sampleInput": {"a": 2, "b": 3},
                "sampleOutput": 5
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["passedTests"], 1);
    assert_eq!(body["totalTests"], 1);
    assert_eq!(body["cases"][0]["actual"], 5);
    assert_eq!(body["cases"][0]["pass"], true);
}

#[tokio::test]
async fn evaluate_endpoint_refuses_python() {
    let base = spawn_app(state(None, PathBuf::from("."))).await;
    let body: Value = reqwest::Client::new()
        .post(format!("{base}/api/evaluate"))
        .json(&json!({
            "source": "def add(a, b): return a + b",
            "language": "python",
            "question": {
                "functionName": "add",
                "parameters": ["a", "b"],
                "sampleInput": [1, 2],
                "sampleOutput": 3
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["totalTests"], 0);
    assert!(body["error"].as_str().unwrap().contains("Only JavaScript"));
}

#[tokio::test]
async fn static_files_and_spa_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>app</h1>").unwrap();
    std::fs::create_dir(dir.path().join("js")).unwrap();
    std::fs::write(dir.path().join("js").join("main.js"), "console.log(1);").unwrap();

    let base = spawn_app(state(None, dir.path().to_path_buf())).await;

    let js = reqwest::get(format!("{base}/js/main.js")).await.unwrap();
    assert_eq!(js.status(), 200);
    assert!(js.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
    assert_eq!(js.text().await.unwrap(), "console.log(1);");

    let deep_link = reqwest::get(format!("{base}/results/42")).await.unwrap();
    assert_eq!(deep_link.status(), 200);
    assert_eq!(deep_link.text().await.unwrap(), "<h1>app</h1>");

    let root = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(root.text().await.unwrap(), "<h1>app</h1>");
}
