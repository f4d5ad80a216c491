use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use url::Url;

use seer_notify::{Delivery, Notifier, NotifyArgs, NotifyError, NotifyOutcome, ReleaseStatus};

#[derive(Debug, Clone)]
struct Call {
    path: String,
    auth: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    release_status: StatusCode,
    calls: Arc<Mutex<Vec<Call>>>,
}

async fn record(State(stub): State<Stub>, uri: Uri, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    stub.calls.lock().await.push(Call {
        path: path.clone(),
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let status = if path.ends_with("/deploys/") {
        StatusCode::CREATED
    } else if path.ends_with("/releases/") {
        stub.release_status
    } else if path == "/hook" {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "path": path })))
}

async fn spawn_stub(release_status: StatusCode) -> (String, Arc<Mutex<Vec<Call>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(Stub {
        release_status,
        calls: Arc::clone(&calls),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), calls)
}

fn api_args(base: &str) -> NotifyArgs {
    NotifyArgs {
        release: Some("web/1.0".into()),
        environment: "production".into(),
        project_slug: Some("playground".into()),
        org_slug: Some("acme".into()),
        token: Some(" secret-token ".into()),
        deploy_name: Some("Deploy 7".into()),
        deploy_url: Some("https://playground.example.test".into()),
        commit: Some("abc123".into()),
        api_base: format!("{}/api/0", base),
        ..NotifyArgs::default()
    }
}

#[tokio::test]
async fn test_api_flow_creates_release_then_deploy() {
    let (base, calls) = spawn_stub(StatusCode::CREATED).await;
    let args = api_args(&base);

    let outcome = Notifier::new()
        .unwrap()
        .notify(&args.release(chrono::Utc::now()), &args.delivery().unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::Registered(ReleaseStatus::Created));

    let calls = calls.lock().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path, "/api/0/organizations/acme/releases/");
    assert_eq!(calls[0].auth.as_deref(), Some("Bearer secret-token"));
    assert_eq!(
        calls[0].body,
        json!({
            "version": "web/1.0",
            "projects": ["playground"],
            "url": "https://playground.example.test",
            "commit": "abc123"
        })
    );
    assert_eq!(calls[1].path, "/api/0/organizations/acme/releases/web%2F1.0/deploys/");
    assert_eq!(
        calls[1].body,
        json!({ "environment": "production", "name": "Deploy 7", "url": "https://playground.example.test" })
    );
}

#[tokio::test]
async fn test_existing_release_still_records_deploy() {
    for status in [StatusCode::ALREADY_REPORTED, StatusCode::CONFLICT] {
        let (base, calls) = spawn_stub(status).await;
        let args = api_args(&base);

        let outcome = Notifier::new()
            .unwrap()
            .notify(&args.release(chrono::Utc::now()), &args.delivery().unwrap())
            .await
            .unwrap();

        assert_eq!(outcome, NotifyOutcome::Registered(ReleaseStatus::AlreadyExists));
        assert_eq!(calls.lock().await.len(), 2);
    }
}

#[tokio::test]
async fn test_release_rejection_is_fatal() {
    let (base, calls) = spawn_stub(StatusCode::FORBIDDEN).await;
    let args = api_args(&base);

    let err = Notifier::new()
        .unwrap()
        .notify(&args.release(chrono::Utc::now()), &args.delivery().unwrap())
        .await
        .unwrap_err();

    match err {
        NotifyError::Rejected { action, status, .. } => {
            assert_eq!(action, "release creation");
            assert_eq!(status, 403);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(calls.lock().await.len(), 1);
}

#[tokio::test]
async fn test_webhook_delivery() {
    let (base, calls) = spawn_stub(StatusCode::CREATED).await;
    let args = NotifyArgs {
        release: Some("web@3.1".into()),
        environment: "staging".into(),
        project_slug: Some("playground".into()),
        webhook_url: Some(format!("{}/hook", base)),
        deploy_name: Some("Deploy 9".into()),
        ..NotifyArgs::default()
    };

    let outcome = Notifier::new()
        .unwrap()
        .notify(&args.release(chrono::Utc::now()), &args.delivery().unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::WebhookDelivered);
    let calls = calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].auth, None);
    assert_eq!(
        calls[0].body,
        json!({
            "version": "web@3.1",
            "environment": "staging",
            "projects": ["playground"],
            "deploy": { "environment": "staging", "name": "Deploy 9" }
        })
    );
}

#[tokio::test]
async fn test_webhook_failure_carries_status() {
    let (base, _) = spawn_stub(StatusCode::CREATED).await;
    let url = Url::parse(&format!("{}/broken", base)).unwrap();
    let release = NotifyArgs::default().release(chrono::Utc::now());

    let err = Notifier::new()
        .unwrap()
        .notify(&release, &Delivery::Webhook(url))
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Rejected { status: 500, .. }));
    assert!(err.to_string().contains("webhook delivery failed with status 500"));
}
