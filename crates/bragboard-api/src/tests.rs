//! Router-level tests against an in-memory store.

use std::path::PathBuf;

use axum::{
  body::Body,
  http::{Method, Request, StatusCode, header},
  response::Response,
};
use bragboard_core::{
  store::BoardStore,
  user::{NewUser, Role, User},
};
use bragboard_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, ServerConfig, auth::issue_token, router};

fn test_config() -> ServerConfig {
  ServerConfig {
    host:              "127.0.0.1".to_string(),
    port:              8000,
    database_path:     PathBuf::from(":memory:"),
    jwt_secret:        "test-secret".to_string(),
    token_ttl_minutes: 60,
    allowed_origins:   vec![],
  }
}

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(store, test_config())
}

/// Insert a user straight into the store and mint a token for them, skipping
/// the password hashing that registration does.
async fn member(state: &AppState<SqliteStore>, name: &str, role: Role) -> (User, String) {
  let user = state
    .store
    .create_user(NewUser {
      email: format!("{}@example.com", name.to_lowercase()),
      name: name.into(),
      department: "Engineering".into(),
      password_hash: "unused".into(),
      role,
    })
    .await
    .unwrap();
  let token = issue_token(&state.auth, user.id).unwrap();
  (user, token)
}

async fn send_raw(
  state: &AppState<SqliteStore>,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  router(state.clone()).oneshot(req).await.unwrap()
}

async fn send(
  state: &AppState<SqliteStore>,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let resp = send_raw(state, method, uri, token, body).await;
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, json)
}

async fn notifications(state: &AppState<SqliteStore>, token: &str) -> Vec<Value> {
  let (status, body) =
    send(state, Method::GET, "/api/notifications", Some(token), None).await;
  assert_eq!(status, StatusCode::OK);
  body.as_array().unwrap().clone()
}

fn messages(notes: &[Value], kind: &str) -> Vec<String> {
  notes
    .iter()
    .filter(|n| n["type"] == kind)
    .map(|n| n["message"].as_str().unwrap().to_string())
    .collect()
}

async fn post_shoutout(
  state: &AppState<SqliteStore>,
  token: &str,
  recipients: &[i64],
) -> i64 {
  let (status, body) = send(
    state,
    Method::POST,
    "/api/shoutouts",
    Some(token),
    Some(json!({ "message": "Great job!", "recipient_ids": recipients })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

// ── Accounts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_login_and_me() {
  let state = make_state().await;
  let (status, body) = send(
    &state,
    Method::POST,
    "/api/auth/register",
    None,
    Some(json!({
      "email": "Dana@Example.com",
      "name": "Dana",
      "department": "Design",
      "password": "s3cret"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["token_type"], "bearer");
  assert_eq!(body["user"]["email"], "dana@example.com");
  assert_eq!(body["user"]["role"], "employee");
  assert!(body["user"].get("password_hash").is_none());

  let (status, body) = send(
    &state,
    Method::POST,
    "/api/auth/register",
    None,
    Some(json!({
      "email": "dana@example.com",
      "name": "Other Dana",
      "department": "Sales",
      "password": "x"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("email"));

  let resp = send_raw(
    &state,
    Method::POST,
    "/api/auth/login",
    None,
    Some(json!({ "email": "dana@example.com", "password": "wrong" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");

  let (status, body) = send(
    &state,
    Method::POST,
    "/api/auth/login",
    None,
    Some(json!({ "email": "dana@example.com", "password": "s3cret" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let token = body["access_token"].as_str().unwrap().to_string();

  let (status, body) = send(&state, Method::GET, "/api/auth/me", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Dana");
}

#[tokio::test]
async fn password_change_requires_current_password() {
  let state = make_state().await;
  let (_, body) = send(
    &state,
    Method::POST,
    "/api/auth/register",
    None,
    Some(json!({
      "email": "erin@example.com",
      "name": "Erin",
      "department": "Ops",
      "password": "old-pass"
    })),
  )
  .await;
  let token = body["access_token"].as_str().unwrap().to_string();

  for body in [
    json!({ "current_password": "nope", "new_password": "new-pass" }),
    json!({ "new_password": "new-pass" }),
    json!({ "current_password": "old-pass" }),
    json!({ "current_password": "old-pass", "new_password": "" }),
  ] {
    let (status, _) =
      send(&state, Method::PATCH, "/api/users/me", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  let (status, _) = send(
    &state,
    Method::POST,
    "/api/auth/login",
    None,
    Some(json!({ "email": "erin@example.com", "password": "old-pass" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(
    &state,
    Method::PATCH,
    "/api/users/me",
    Some(&token),
    Some(json!({
      "name": "Erin E.",
      "current_password": "old-pass",
      "new_password": "new-pass"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Erin E.");

  let (status, _) = send(
    &state,
    Method::POST,
    "/api/auth/login",
    None,
    Some(json!({ "email": "erin@example.com", "password": "new-pass" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

#[test]
fn token_lifetime_must_be_positive_and_in_range() {
  assert_eq!(test_config().token_ttl(), Some(chrono::Duration::minutes(60)));
  for minutes in [0, -5, i64::MAX / 1000] {
    let config = ServerConfig {
      token_ttl_minutes: minutes,
      ..test_config()
    };
    assert_eq!(config.token_ttl(), None);
  }
}

#[tokio::test]
async fn out_of_range_token_lifetime_still_issues_tokens() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let state = AppState::new(store, ServerConfig {
    token_ttl_minutes: i64::MAX / 1000,
    ..test_config()
  });
  let (_, token) = member(&state, "Quinn", Role::Employee).await;
  let (status, _) = send(&state, Method::GET, "/api/auth/me", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_or_stale_tokens_are_unauthorized() {
  let state = make_state().await;

  let (status, body) = send(&state, Method::GET, "/api/shoutouts", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body["error"].is_string());

  let (status, _) =
    send(&state, Method::GET, "/api/shoutouts", Some("garbage"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (ghost, token) = member(&state, "Ghost", Role::Employee).await;
  state.store.delete_user(ghost.id).await.unwrap();
  let (status, _) =
    send(&state, Method::GET, "/api/auth/me", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Users ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_manages_users() {
  let state = make_state().await;
  let (_, admin) = member(&state, "Root", Role::Admin).await;
  let (bob, bob_token) = member(&state, "Bob", Role::Employee).await;

  let (status, body) = send(&state, Method::GET, "/api/users", Some(&bob_token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);

  let (status, body) = send(
    &state,
    Method::GET,
    "/api/users?department=Sales",
    Some(&bob_token),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.as_array().unwrap().is_empty());

  let (status, _) =
    send(&state, Method::GET, "/api/users/999", Some(&bob_token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let uri = format!("/api/users/{}/role", bob.id);
  let (status, _) = send(
    &state,
    Method::PATCH,
    &uri,
    Some(&bob_token),
    Some(json!({ "role": "admin" })),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, body) = send(
    &state,
    Method::PATCH,
    &uri,
    Some(&admin),
    Some(json!({ "role": "admin" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["role"], "admin");

  let uri = format!("/api/users/{}", bob.id);
  let (status, _) = send(&state, Method::DELETE, &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = send(&state, Method::DELETE, &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Shout-outs, comments, reactions ──────────────────────────────────────────

#[tokio::test]
async fn engagement_scenario_notifies_the_right_people() {
  let state = make_state().await;
  let (_, a) = member(&state, "Alice", Role::Employee).await;
  let (b_user, b) = member(&state, "Bob", Role::Employee).await;
  let (c_user, c) = member(&state, "Carol", Role::Employee).await;

  let id = post_shoutout(&state, &a, &[b_user.id, c_user.id]).await;
  assert_eq!(messages(&notifications(&state, &b).await, "tag").len(), 1);
  assert_eq!(messages(&notifications(&state, &c).await, "tag").len(), 1);
  assert!(notifications(&state, &a).await.is_empty());

  let (status, body) = send(
    &state,
    Method::POST,
    &format!("/api/shoutouts/{id}/comments"),
    Some(&b),
    Some(json!({ "content": "Thanks!" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["user"]["name"], "Bob");

  let reactions = format!("/api/shoutouts/{id}/reactions");
  let (status, body) = send(
    &state,
    Method::POST,
    &reactions,
    Some(&c),
    Some(json!({ "type": "like" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "message": "Reaction added", "action": "added" }));

  let (_, body) = send(
    &state,
    Method::POST,
    &reactions,
    Some(&c),
    Some(json!({ "type": "like" })),
  )
  .await;
  assert_eq!(body["action"], "removed");

  let a_notes = notifications(&state, &a).await;
  assert_eq!(messages(&a_notes, "comment"), vec!["Bob commented on your shout-out"]);
  assert_eq!(messages(&a_notes, "reaction"), vec!["Carol reacted to your shout-out"]);

  let b_notes = notifications(&state, &b).await;
  assert!(messages(&b_notes, "comment").is_empty());
  assert_eq!(
    messages(&b_notes, "reaction"),
    vec!["Carol reacted to a shout-out you are part of"]
  );

  let c_notes = notifications(&state, &c).await;
  assert_eq!(
    messages(&c_notes, "comment"),
    vec!["Bob commented on a shout-out you are part of"]
  );
  assert!(messages(&c_notes, "reaction").is_empty());

  let (status, view) =
    send(&state, Method::GET, &format!("/api/shoutouts/{id}"), Some(&c), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(view["comments"].as_array().unwrap().len(), 1);
  assert_eq!(view["recipients"].as_array().unwrap().len(), 2);
  assert!(view["reaction_counts"].as_array().unwrap().is_empty());
  assert!(view["user_reaction"].is_null());
  assert!(view["sender"].get("password_hash").is_none());
}

#[tokio::test]
async fn shoutout_validation() {
  let state = make_state().await;
  let (_, a) = member(&state, "Alice", Role::Employee).await;
  let (bob, _) = member(&state, "Bob", Role::Employee).await;

  let cases = [
    (json!({ "message": "hi", "recipient_ids": [] }), StatusCode::BAD_REQUEST),
    (json!({ "message": "hi", "recipient_ids": [4242] }), StatusCode::NOT_FOUND),
    (json!({ "message": "  ", "recipient_ids": [bob.id] }), StatusCode::BAD_REQUEST),
  ];
  for (body, expected) in cases {
    let (status, _) =
      send(&state, Method::POST, "/api/shoutouts", Some(&a), Some(body)).await;
    assert_eq!(status, expected);
  }

  let (status, _) =
    send(&state, Method::GET, "/api/shoutouts/1", Some(&a), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feeds_and_filters() {
  let state = make_state().await;
  let (alice, a) = member(&state, "Alice", Role::Employee).await;
  let (bob, b) = member(&state, "Bob", Role::Employee).await;

  post_shoutout(&state, &a, &[bob.id]).await;
  post_shoutout(&state, &b, &[alice.id]).await;

  let (_, mine) = send(&state, Method::GET, "/api/users/me/shoutouts", Some(&a), None).await;
  assert_eq!(mine.as_array().unwrap().len(), 1);
  assert_eq!(mine[0]["sender_id"], alice.id);

  let (_, tagged) = send(&state, Method::GET, "/api/users/me/tagged", Some(&a), None).await;
  assert_eq!(tagged.as_array().unwrap().len(), 1);
  assert_eq!(tagged[0]["sender_id"], bob.id);

  let uri = format!("/api/shoutouts?sender_id={}", bob.id);
  let (_, from_bob) = send(&state, Method::GET, &uri, Some(&a), None).await;
  assert_eq!(from_bob.as_array().unwrap().len(), 1);

  let (_, all) = send(
    &state,
    Method::GET,
    "/api/shoutouts?department=Engineering",
    Some(&a),
    None,
  )
  .await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, future) = send(
    &state,
    Method::GET,
    "/api/shoutouts?start_date=2999-01-01",
    Some(&a),
    None,
  )
  .await;
  assert!(future.as_array().unwrap().is_empty());

  let (status, _) = send(
    &state,
    Method::GET,
    "/api/shoutouts?start_date=soon",
    Some(&a),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_owner_or_admin_deletes() {
  let state = make_state().await;
  let (_, a) = member(&state, "Alice", Role::Employee).await;
  let (bob, b) = member(&state, "Bob", Role::Employee).await;
  let (_, admin) = member(&state, "Root", Role::Admin).await;

  let id = post_shoutout(&state, &a, &[bob.id]).await;
  let (_, comment) = send(
    &state,
    Method::POST,
    &format!("/api/shoutouts/{id}/comments"),
    Some(&b),
    Some(json!({ "content": "cheers" })),
  )
  .await;
  let comment_uri = format!("/api/comments/{}", comment["id"]);

  let (status, _) = send(&state, Method::DELETE, &comment_uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, _) = send(&state, Method::DELETE, &comment_uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::OK);

  let uri = format!("/api/shoutouts/{id}");
  let (status, _) = send(&state, Method::DELETE, &uri, Some(&b), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, body) = send(&state, Method::DELETE, &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Shout-out deleted successfully");
  let (status, _) = send(&state, Method::DELETE, &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  // The tag notification went with the shout-out.
  assert!(notifications(&state, &b).await.is_empty());
}

#[tokio::test]
async fn reaction_listing() {
  let state = make_state().await;
  let (_, a) = member(&state, "Alice", Role::Employee).await;
  let (bob, b) = member(&state, "Bob", Role::Employee).await;
  let (_, c) = member(&state, "Carol", Role::Employee).await;

  let id = post_shoutout(&state, &a, &[bob.id]).await;
  let uri = format!("/api/shoutouts/{id}/reactions");
  for (token, kind) in [(&b, "clap"), (&c, "star")] {
    send(&state, Method::POST, &uri, Some(token), Some(json!({ "type": kind }))).await;
  }

  let (status, body) = send(&state, Method::GET, &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);

  let (_, stars) =
    send(&state, Method::GET, &format!("{uri}?type=star"), Some(&a), None).await;
  assert_eq!(stars.as_array().unwrap().len(), 1);
  assert_eq!(stars[0]["user"]["name"], "Carol");
  assert_eq!(stars[0]["type"], "star");

  let (status, _) =
    send(&state, Method::GET, &format!("{uri}?limit=0"), Some(&a), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &state,
    Method::GET,
    "/api/shoutouts/999/reactions",
    Some(&a),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Moderation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_reach_admins() {
  let state = make_state().await;
  let (_, a) = member(&state, "Alice", Role::Employee).await;
  let (bob, b) = member(&state, "Bob", Role::Employee).await;
  let (_, admin) = member(&state, "Root", Role::Admin).await;

  let id = post_shoutout(&state, &a, &[bob.id]).await;

  let (status, _) = send(
    &state,
    Method::POST,
    "/api/reports",
    Some(&b),
    Some(json!({ "reason": "no target" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(notifications(&state, &admin).await.is_empty());

  let (status, body) = send(
    &state,
    Method::POST,
    "/api/reports",
    Some(&b),
    Some(json!({ "shoutout_id": id, "reason": "spam" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["report"]["status"], "pending");
  let report_id = body["report"]["id"].as_i64().unwrap();

  assert_eq!(
    messages(&notifications(&state, &admin).await, "report"),
    vec![format!("Bob reported shout-out #{id}")]
  );

  let (status, _) = send(&state, Method::GET, "/api/admin/reports", Some(&b), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, list) = send(
    &state,
    Method::GET,
    "/api/admin/reports?status=pending",
    Some(&admin),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list[0]["target_type"], "shoutout");
  assert_eq!(list[0]["reporter"]["name"], "Bob");
  assert_eq!(list[0]["target_user_name"], "Alice");

  let (status, body) = send(
    &state,
    Method::PATCH,
    &format!("/api/admin/reports/{report_id}/status"),
    Some(&admin),
    Some(json!({ "status": "resolved" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "resolved");

  let (_, pending) = send(
    &state,
    Method::GET,
    "/api/admin/reports?status=pending",
    Some(&admin),
    None,
  )
  .await;
  assert!(pending.as_array().unwrap().is_empty());
}

// ── Notifications ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn notifications_are_private_and_markable() {
  let state = make_state().await;
  let (alice, a) = member(&state, "Alice", Role::Employee).await;
  let (bob, b) = member(&state, "Bob", Role::Employee).await;

  post_shoutout(&state, &a, &[bob.id]).await;
  post_shoutout(&state, &a, &[bob.id]).await;
  post_shoutout(&state, &b, &[alice.id]).await;

  let bob_notes = notifications(&state, &b).await;
  assert_eq!(bob_notes.len(), 2);
  let first = bob_notes[0]["id"].as_i64().unwrap();
  assert!(bob_notes[0].get("user_id").is_none());

  let uri = format!("/api/notifications/{first}/read");
  let (status, _) = send(&state, Method::POST, &uri, Some(&a), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(&state, Method::POST, &uri, Some(&b), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["is_read"], true);

  let (status, body) = send(
    &state,
    Method::POST,
    "/api/notifications/mark-all-read",
    Some(&b),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "status": "ok", "updated": 1 }));

  // Alice's own notification is untouched.
  let alice_notes = notifications(&state, &a).await;
  assert_eq!(alice_notes.len(), 1);
  assert_eq!(alice_notes[0]["is_read"], false);
}
