use std::sync::Arc;

use chrono::{Duration, Utc};
use impersonate_application::{
    ImpersonationSessionRepository, OpenImpersonationSession, PermissionWindowFilter,
    PermissionWindowListQuery, PermissionWindowRepository, UserSummary,
};
use impersonate_core::{AppError, UserId};
use impersonate_domain::{PermissionWindow, PermissionWindowId};

use super::{InMemoryImpersonationSessionRepository, InMemoryPermissionWindowRepository};

fn summary(first_name: &str, last_name: &str) -> UserSummary {
    UserSummary {
        user_id: UserId::new(),
        username: first_name.to_lowercase(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: Some(format!("{}@example.com", first_name.to_lowercase())),
    }
}

fn window_from_now(user_id: UserId, starts_minutes: i64, ends_minutes: i64) -> PermissionWindow {
    let now = Utc::now();
    PermissionWindow::new(
        PermissionWindowId::new(),
        user_id,
        now + Duration::minutes(starts_minutes),
        now + Duration::minutes(ends_minutes),
        true,
        now,
    )
}

#[tokio::test]
async fn create_for_unknown_user_is_not_found() {
    let repository = InMemoryPermissionWindowRepository::new();

    let result = repository
        .create_window(window_from_now(UserId::new(), -1, 60))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn concurrent_creates_leave_one_active_window() {
    let repository = Arc::new(InMemoryPermissionWindowRepository::new());
    let user = summary("Max", "Power");
    let user_id = user.user_id;
    repository.add_user(user).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            repository
                .create_window(window_from_now(user_id, -1, 60))
                .await
        }));
    }
    for handle in handles {
        assert!(matches!(handle.await, Ok(Ok(_))));
    }

    let active = repository.list_active_windows(user_id).await;
    assert_eq!(active.map(|windows| windows.len()).ok(), Some(1));
}

#[tokio::test]
async fn bulk_disable_ignores_inactive_and_other_users() {
    let repository = InMemoryPermissionWindowRepository::new();
    let owner = summary("Owner", "One");
    let other = summary("Other", "Two");
    let (owner_id, other_id) = (owner.user_id, other.user_id);
    repository.add_user(owner).await;
    repository.add_user(other).await;

    for window in [
        window_from_now(owner_id, -1, 60),
        window_from_now(owner_id, 30, 60),
        window_from_now(other_id, -1, 60),
    ] {
        assert!(repository.create_window(window).await.is_ok());
    }

    let disabled = repository
        .disable_windows(PermissionWindowFilter::active_for_user(owner_id))
        .await;

    assert_eq!(disabled.ok(), Some(1));
    let other_active = repository.list_active_windows(other_id).await;
    assert_eq!(other_active.map(|windows| windows.len()).ok(), Some(1));
}

#[tokio::test]
async fn listing_searches_and_orders_newest_first() {
    let repository = InMemoryPermissionWindowRepository::new();
    let alice = summary("Alice", "Anders");
    let bob = summary("Bob", "Builder");
    let (alice_id, bob_id) = (alice.user_id, bob.user_id);
    repository.add_user(alice).await;
    repository.add_user(bob).await;

    let now = Utc::now();
    let older = PermissionWindow::new(
        PermissionWindowId::new(),
        alice_id,
        now - Duration::hours(3),
        now - Duration::hours(2),
        true,
        now - Duration::hours(3),
    );
    let newer = window_from_now(alice_id, -1, 60);
    for window in [older.clone(), newer.clone(), window_from_now(bob_id, -1, 60)] {
        assert!(repository.create_window(window).await.is_ok());
    }

    let entries = repository
        .list_windows(PermissionWindowListQuery {
            search: Some("ANDERS".to_owned()),
            ..PermissionWindowListQuery::default()
        })
        .await;

    let ids = entries
        .map(|entries| entries.iter().map(|entry| entry.window.id()).collect::<Vec<_>>())
        .ok();
    assert_eq!(ids, Some(vec![newer.id(), older.id()]));
}

#[tokio::test]
async fn impersonable_users_are_sorted_by_name() {
    let repository = InMemoryPermissionWindowRepository::new();
    let zed = summary("Zed", "Last");
    let amy = summary("Amy", "First");
    let idle = summary("Idle", "User");
    let (zed_id, amy_id) = (zed.user_id, amy.user_id);
    repository.add_user(zed).await;
    repository.add_user(amy).await;
    repository.add_user(idle).await;

    assert!(repository.create_window(window_from_now(zed_id, -1, 60)).await.is_ok());
    assert!(repository.create_window(window_from_now(amy_id, -1, 60)).await.is_ok());

    let users = repository.list_impersonable_users().await;

    let names = users
        .map(|users| users.into_iter().map(|user| user.first_name).collect::<Vec<_>>())
        .ok();
    assert_eq!(names, Some(vec!["Amy".to_owned(), "Zed".to_owned()]));
}

#[tokio::test]
async fn ended_sessions_are_not_listed() {
    let repository = InMemoryImpersonationSessionRepository::new();
    let admin = summary("Admin", "Staff");
    let user_id = UserId::new();
    repository
        .open_session(OpenImpersonationSession {
            session_key: "session-1".to_owned(),
            impersonator: admin,
            impersonating_user_id: user_id,
            session_started_at: Utc::now() - Duration::minutes(5),
        })
        .await;

    let open = repository.list_open_sessions(user_id).await;
    repository.end_session("session-1").await;
    let ended = repository.list_open_sessions(user_id).await;

    assert_eq!(open.map(|sessions| sessions.len()).ok(), Some(1));
    assert_eq!(ended.map(|sessions| sessions.len()).ok(), Some(0));
}
