use axum::{
    extract::{Form, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use period_tui::api::{ApiClient, ApiError};
use period_tui::types::{AdjustKind, AdjustPeriod, AuthState, ProfileForm, SelectedDate};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Fields = HashMap<String, String>;

/// Form submissions received by the fake server, keyed by path.
#[derive(Clone, Default)]
struct Received(Arc<Mutex<Vec<(String, Fields)>>>);

impl Received {
    fn record(&self, path: impl Into<String>, fields: Fields) {
        self.0.lock().unwrap().push((path.into(), fields));
    }

    fn all(&self) -> Vec<(String, Fields)> {
        self.0.lock().unwrap().clone()
    }
}

const INDEX_HTML: &str = r#"<html><body>
<form id="profileForm">
  <input type="hidden" name="csrfmiddlewaretoken" value="form-token">
</form>
</body></html>"#;

async fn index() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "csrftoken=cookie-token; Path=/")],
        Html(INDEX_HTML),
    )
}

async fn info(Query(query): Query<Fields>) -> Json<Value> {
    let date = query.get("date").cloned().unwrap_or_default();
    if date == "2024-01-10" {
        Json(json!({
            "success": true,
            "date": date,
            "is_start_possible": false,
            "end_candidate_records": [
                {"id": 7, "start_date": "2024-01-06", "is_predicted": true, "current_end_date": "2024-01-10"}
            ]
        }))
    } else {
        Json(json!({"success": false, "message": "无效的日期"}))
    }
}

async fn start(State(received): State<Received>, Form(fields): Form<Fields>) -> Json<Value> {
    received.record("/period/start/", fields);
    Json(json!({"success": true, "message": "经期开始日期已记录"}))
}

async fn end(State(received): State<Received>, Form(fields): Form<Fields>) -> Json<Value> {
    received.record("/period/end/", fields);
    Json(json!({"success": false, "message": "经期持续时间过长，请检查日期"}))
}

async fn adjust(State(received): State<Received>, Form(fields): Form<Fields>) -> Json<Value> {
    received.record("/period/adjust/", fields);
    Json(json!({"success": true}))
}

async fn delete(
    State(received): State<Received>,
    Path(id): Path<i64>,
    Form(fields): Form<Fields>,
) -> Json<Value> {
    received.record(format!("/period/delete/{}/", id), fields);
    Json(json!({"success": true, "message": "记录删除成功"}))
}

async fn delete_account(
    State(received): State<Received>,
    Form(fields): Form<Fields>,
) -> Json<Value> {
    let accepted = fields.get("password").map(String::as_str) == Some("secret");
    received.record("/period/delete-account/", fields);
    if accepted {
        Json(json!({"success": true, "message": "账户已删除"}))
    } else {
        Json(json!({"success": false, "message": "密码错误，删除操作已取消"}))
    }
}

async fn set_profile(State(received): State<Received>, Form(fields): Form<Fields>) -> Json<Value> {
    received.record("/period/set-profile-ajax/", fields);
    Json(json!({"success": true, "message": "基础信息保存成功"}))
}

async fn predictions() -> Redirect {
    Redirect::to("/period/login/?next=/period/predictions/")
}

async fn spawn_server(received: Received) -> String {
    let app = Router::new()
        .route("/", get(index))
        .route("/period/info/", get(info))
        .route("/period/start/", post(start))
        .route("/period/end/", post(end))
        .route("/period/adjust/", post(adjust))
        .route("/period/delete/:id/", post(delete))
        .route("/period/delete-account/", post(delete_account))
        .route("/period/set-profile-ajax/", post(set_profile))
        .route("/period/predictions/", get(predictions))
        .with_state(received);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn primed_client(received: &Received) -> ApiClient {
    let base_url = spawn_server(received.clone()).await;
    let mut client = ApiClient::new(&base_url, vec![]).unwrap();
    client.prime_csrf().await.unwrap();
    client
}

fn date(raw: &str) -> SelectedDate {
    raw.parse().unwrap()
}

#[tokio::test]
async fn decodes_period_info_envelope() {
    let received = Received::default();
    let mut client = primed_client(&received).await;

    let info = client.period_info(date("2024-01-10")).await.unwrap();
    assert!(!info.is_start_possible);
    assert_eq!(info.end_candidate_records.len(), 1);
    assert_eq!(info.end_candidate_records[0].id, 7);
    assert!(info.end_candidate_records[0].is_predicted);

    let err = client.period_info(date("2024-01-11")).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref message) if message == "无效的日期"));
}

#[tokio::test]
async fn mutations_carry_hidden_field_token() {
    let received = Received::default();
    let mut client = primed_client(&received).await;
    assert_eq!(client.csrf_token(), "form-token");

    client.mark_start(date("2024-01-06")).await.unwrap();
    client
        .adjust_period(&AdjustPeriod {
            record_id: 7,
            kind: AdjustKind::Both,
            start_date: Some("2024-01-06".to_string()),
            end_date: Some("2024-01-10".to_string()),
        })
        .await
        .unwrap();

    let all = received.all();
    assert_eq!(all.len(), 2);

    let (path, fields) = &all[0];
    assert_eq!(path, "/period/start/");
    assert_eq!(fields["csrfmiddlewaretoken"], "form-token");
    assert_eq!(fields["start_date"], "2024-01-06");

    let (path, fields) = &all[1];
    assert_eq!(path, "/period/adjust/");
    assert_eq!(fields["record_id"], "7");
    assert_eq!(fields["action"], "both");
    assert_eq!(fields["end_date"], "2024-01-10");
}

#[tokio::test]
async fn rejected_mutation_surfaces_server_message() {
    let received = Received::default();
    let mut client = primed_client(&received).await;

    let err = client.mark_end(date("2024-01-30")).await.unwrap_err();
    assert_eq!(
        err.failure_text("标记失败"),
        "标记失败: 经期持续时间过长，请检查日期"
    );
    assert_eq!(received.all()[0].1["end_date"], "2024-01-30");
}

#[tokio::test]
async fn delete_posts_to_record_path() {
    let received = Received::default();
    let mut client = primed_client(&received).await;

    client.delete_record(7).await.unwrap();

    let all = received.all();
    assert_eq!(all[0].0, "/period/delete/7/");
    assert_eq!(all[0].1["csrfmiddlewaretoken"], "form-token");
}

#[tokio::test]
async fn account_deletion_sends_password_and_confirmation() {
    let received = Received::default();
    let mut client = primed_client(&received).await;

    let err = client.delete_account("wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref message) if message == "密码错误，删除操作已取消"));
    client.delete_account("secret").await.unwrap();

    let all = received.all();
    assert_eq!(all.len(), 2);
    let (path, fields) = &all[1];
    assert_eq!(path, "/period/delete-account/");
    assert_eq!(fields["password"], "secret");
    assert_eq!(fields["confirm_delete"], "true");
    assert_eq!(fields["csrfmiddlewaretoken"], "form-token");
}

#[tokio::test]
async fn profile_form_posts_both_lengths() {
    let received = Received::default();
    let mut client = primed_client(&received).await;

    client
        .save_profile(&ProfileForm {
            cycle_length: "30".to_string(),
            period_length: "6".to_string(),
        })
        .await
        .unwrap();

    let all = received.all();
    let (path, fields) = &all[0];
    assert_eq!(path, "/period/set-profile-ajax/");
    assert_eq!(fields["cycle_length"], "30");
    assert_eq!(fields["period_length"], "6");
    assert_eq!(fields["csrfmiddlewaretoken"], "form-token");
}

#[tokio::test]
async fn login_redirect_means_no_session() {
    let received = Received::default();
    let mut client = primed_client(&received).await;

    let err = client.predictions().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(
        client.check_session().await.unwrap(),
        AuthState::Anonymous
    );
}

#[tokio::test]
async fn cookie_token_is_used_without_hidden_field() {
    let received = Received::default();
    let base_url = spawn_server(received.clone()).await;
    let mut client = ApiClient::new(&base_url, vec![("csrftoken".to_string(), "saved".to_string())])
        .unwrap();

    client.mark_start(date("2024-02-01")).await.unwrap();

    assert_eq!(received.all()[0].1["csrfmiddlewaretoken"], "saved");
}
