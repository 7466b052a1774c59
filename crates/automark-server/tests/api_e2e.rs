use std::sync::Arc;

use automark_core::Rubric;
use automark_server::{router, AppState, SessionGate, COOKIE_NAME};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde_json::{json, Value};

const CODE: &str = "TEST-CODE-01";

async fn spawn_app() -> String {
    let state = AppState {
        rubric: Rubric::default(),
        gate: SessionGate::new(b"e2e-secret", CODE, 120, false),
        course_back_url: "https://example.test/course".into(),
        next_lesson_url: String::new(),
    };
    let app = router(Arc::new(state), None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Unlock and return the `name=value` pair to send back as a cookie.
async fn unlock(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/api/unlock"))
        .json(&json!({ "code": format!("  {CODE}  ") }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get(SET_COOKIE)
        .expect("unlock sets a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn health_and_config_are_public() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");

    let cfg: Value = client
        .get(format!("{base}/api/config"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cfg["ok"], true);
    assert_eq!(cfg["minWordsGate"], 20);
    assert_eq!(cfg["targetWords"], "300–400");
    assert_eq!(cfg["templateText"], "Role:\nTask:\nContext:\nFormat:");
    assert_eq!(cfg["courseBackUrl"], "https://example.test/course");
    assert!(cfg["questionText"].as_str().unwrap().contains("Task 2"));
}

#[tokio::test]
async fn mark_requires_a_session() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/mark"))
        .json(&json!({ "answerText": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": false, "error": "locked" }));

    let forged = client
        .post(format!("{base}/api/mark"))
        .header(COOKIE, format!("{COOKIE_NAME}=9999999999.deadbeef"))
        .json(&json!({ "answerText": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unlock_rejects_missing_and_wrong_codes() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let missing = client
        .post(format!("{base}/api/unlock"))
        .json(&json!({ "code": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "missing_code");

    let wrong = client
        .post(format!("{base}/api/unlock"))
        .json(&json!({ "code": "TEST-CODE-02" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(SET_COOKIE).is_none());
    let body: Value = wrong.json().await.unwrap();
    assert_eq!(body["error"], "incorrect_code");
}

#[tokio::test]
async fn unlocked_session_gets_scored() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let cookie = unlock(&client, &base).await;

    let body: Value = client
        .post(format!("{base}/api/mark"))
        .header(COOKIE, &cookie)
        .json(&json!({ "answerText": vec!["word"; 25].join(" ") }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
    let result = &body["result"];
    assert_eq!(result["gated"], false);
    assert_eq!(result["score"], 3);
    assert_eq!(result["band"], "Fair");
    assert_eq!(result["tags"].as_array().unwrap().len(), 4);
    assert_eq!(result["grid"]["impact"], "✗ Missing");
    assert_eq!(result["guideGated"], true);
    assert!(result["guideScore"].is_null());
}

#[tokio::test]
async fn short_answer_is_gated_not_locked() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let cookie = unlock(&client, &base).await;

    let resp = client
        .post(format!("{base}/api/mark"))
        .header(COOKIE, &cookie)
        .json(&json!({ "answerText": "Role: Task: Context: Format:" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"]["gated"], true);
    assert!(body["result"]["score"].is_null());
    assert!(body["result"]["modelAnswer"].is_null());
}

#[tokio::test]
async fn workflow_evidence_and_garbled_fields_are_tolerated() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let cookie = unlock(&client, &base).await;

    let body: Value = client
        .post(format!("{base}/api/mark"))
        .header(COOKIE, &cookie)
        .json(&json!({
            "answerText": vec!["word"; 25].join(" "),
            "finalGuideText": 12345,
            "workflowEvidence": {
                "similarityPct": 60,
                "prompt2WordCount": 45,
                "didRefine": false,
                "didCopyEditedToStep4": true
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // structure 3, collaboration 10 from evidence, quality 3
    assert_eq!(body["result"]["score"], 5);
    assert_eq!(body["result"]["guideWordCount"], 0);

    let raw = client
        .post(format!("{base}/api/mark"))
        .header(COOKIE, &cookie)
        .header("content-type", "application/json")
        .body("{definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status(), StatusCode::OK);
    let body: Value = raw.json().await.unwrap();
    assert_eq!(body["result"]["gated"], true);
    assert_eq!(body["result"]["wordCount"], 0);
}

#[tokio::test]
async fn oversized_fields_are_clamped_before_scoring() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let cookie = unlock(&client, &base).await;

    // 1300 words is 6499 chars; the structure markers sit past char 6000.
    let answer = format!("{} role: task: context format", vec!["word"; 1300].join(" "));
    // 10000 chars; the first 8000 hold exactly 1600 words.
    let guide = "word ".repeat(2000);

    let body: Value = client
        .post(format!("{base}/api/mark"))
        .header(COOKIE, &cookie)
        .json(&json!({ "answerText": answer, "finalGuideText": guide }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let result = &body["result"];
    assert_eq!(result["wordCount"], 1200);
    assert_eq!(result["tags"][0]["status"], "bad");
    assert_eq!(result["grid"]["ethical"], "✗ Missing");
    assert_eq!(result["guideWordCount"], 1600);
    assert_eq!(result["guideGated"], false);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with(&format!("{COOKIE_NAME}=;")));
    assert!(set_cookie.contains("Max-Age=0"));
}
