use std::path::{Path, PathBuf};
use std::sync::Arc;

use bustix_cli::commands;
use bustix_navigation::PathPermissionTable;
use bustix_session::{FileSessionStore, SessionConfig, SessionContext, SessionStore};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

fn mint(ttl: Duration, role: &str, permissions: &[&str]) -> String {
    let now = Utc::now();
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "sub": "7",
            "email": "desk@bustix.test",
            "name": "Front Desk",
            "iat": now.timestamp(),
            "exp": (now + ttl).timestamp(),
            "role": role,
            "permission": permissions,
        }),
        &EncodingKey::from_secret(b"cli-tests"),
    )
    .expect("failed to encode jwt")
}

fn scratch_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("bustix-cli-{}", uuid::Uuid::now_v7()))
        .join("session.json")
}

fn store_at(path: &Path) -> Arc<dyn SessionStore> {
    Arc::new(FileSessionStore::open(path).expect("open session file"))
}

fn section_names(menu: &Value) -> Vec<&str> {
    menu.as_array()
        .expect("array of sections")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect()
}

#[test]
fn decode_prints_claims() {
    let token = mint(Duration::hours(1), "Agent", &["trips:view"]);
    let out = commands::decode(&token).unwrap();

    assert_eq!(out["sub"], "7");
    assert_eq!(out["email"], "desk@bustix.test");
}

#[test]
fn decode_rejects_garbage() {
    assert!(commands::decode("not-a-token").is_err());
}

#[test]
fn whoami_reports_profile() {
    let token = mint(Duration::hours(1), "Admin", &[]);
    let out = commands::whoami(&token).unwrap();

    assert_eq!(out["name"], "Front Desk");
    assert_eq!(out["isAdmin"], true);
}

#[test]
fn check_explains_each_permission() {
    let token = mint(Duration::hours(1), "Agent", &["trips:view"]);
    let wanted = ["trips:view".to_string(), "users:view".to_string()];
    let out = commands::check(&token, &wanted).unwrap();

    let results = out.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["granted"], true);
    assert_eq!(results[1]["granted"], false);
    assert_eq!(results[1]["denial_reason"]["kind"], "missing_permission");
}

#[test]
fn menu_for_agent_hides_administration() {
    let table = PathPermissionTable::bustix_default();
    let token = mint(Duration::hours(1), "Agent", &["trips:view"]);
    let out = commands::menu(&table, None, &token).unwrap();

    let names = section_names(&out);
    assert!(names.contains(&"General"));
    assert!(names.contains(&"Operations"));
    // Reports is disabled, so Administration keeps that entry.
    let admin = out
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Administration")
        .expect("administration section");
    let titles: Vec<_> = admin["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Reports"]);
}

#[test]
fn menu_for_admin_shows_everything_but_hidden() {
    let table = PathPermissionTable::bustix_default();
    let token = mint(Duration::hours(1), "Admin", &[]);
    let out = commands::menu(&table, None, &token).unwrap();

    let text = out.to_string();
    assert!(text.contains("\"Users\""));
    assert!(text.contains("\"Roles\""));
    assert!(!text.contains("Landing preview"));
}

#[test]
fn login_then_logout_round_trips_through_the_file() {
    let path = scratch_file();
    let token = mint(Duration::hours(1), "Agent", &[]);

    let out = commands::login(store_at(&path), &token, Some("refresh-1".into())).unwrap();
    assert_eq!(out["signedIn"], true);
    assert!(out["expiresAt"].is_string());

    let restored = SessionContext::rehydrate(store_at(&path)).unwrap();
    assert_eq!(restored.token().as_deref(), Some(token.as_str()));
    assert_eq!(restored.refresh_token().unwrap().as_deref(), Some("refresh-1"));

    commands::logout(store_at(&path)).unwrap();
    let cleared = SessionContext::rehydrate(store_at(&path)).unwrap();
    assert!(cleared.token().is_none());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn watch_refuses_without_a_session() {
    let path = scratch_file();
    let result = commands::watch(store_at(&path), &SessionConfig::default()).await;

    assert!(result.is_err());
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn watch_ends_when_the_session_expires() {
    let path = scratch_file();
    let token = mint(Duration::seconds(-30), "Agent", &[]);
    commands::login(store_at(&path), &token, None).unwrap();

    let config = SessionConfig {
        check_interval: std::time::Duration::from_millis(10),
        ..SessionConfig::default()
    };
    let out = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        commands::watch(store_at(&path), &config),
    )
    .await
    .expect("watch should finish")
    .unwrap();

    assert_eq!(out["stopped"], "session expired");
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
