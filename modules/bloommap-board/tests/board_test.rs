use std::sync::Arc;

use bloommap_board::memory::MemoryBackend;
use bloommap_board::{
    Badge, Board, BoardError, BoardState, PhotoUpload, SightingDraft, SightingFilter,
};
use bloommap_common::{AuthContext, AuthSession, GrowthStage, Role, SightingRecord, Species};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

const PHOTO_MAX: usize = 5 * 1024 * 1024;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 5).unwrap()
}

fn ctx(id: &str, privileged: bool) -> AuthContext {
    AuthContext {
        session: AuthSession {
            id: id.to_string(),
            display_name: id.to_string(),
            is_privileged: privileged,
        },
        access_token: id.to_string(),
    }
}

fn sighting(id: &str, user_id: &str, nickname: &str, minutes_ago: i64) -> SightingRecord {
    SightingRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        nickname: nickname.to_string(),
        author_privileged: false,
        region_name: "Seoul Yeouido".to_string(),
        lat: 37.52,
        lon: 126.92,
        species: Species::Cherry,
        stage: GrowthStage::Bloom,
        date: today(),
        photo_url: None,
        note: Some("full bloom".to_string()),
        created_at: Utc.with_ymd_and_hms(2025, 4, 5, 12, 0, 0).unwrap() - Duration::minutes(minutes_ago),
    }
}

fn draft(region: &str) -> SightingDraft {
    SightingDraft {
        region_name: region.to_string(),
        species: Species::Forsythia,
        date: Some(today()),
        ..Default::default()
    }
}

async fn setup() -> (Arc<MemoryBackend>, Board) {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_profile("alice", "Alice", Role::User)
            .await
            .with_profile("bob", "Bob", Role::User)
            .await
            .with_profile("mod", "Moderator", Role::Admin)
            .await,
    );
    backend.seed(sighting("s1", "alice", "Alice", 30)).await;
    backend.seed(sighting("s2", "bob", "Bob", 10)).await;
    let board = Board::new(backend.clone(), PHOTO_MAX);
    (backend, board)
}

#[tokio::test]
async fn empty_region_is_rejected_without_a_write() {
    let (backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();

    let err = state
        .submit(&board, &ctx("alice", false), draft("   "), today())
        .await
        .unwrap_err();

    match err {
        BoardError::Validation(issues) => assert!(issues.iter().any(|i| i.field == "region_name")),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(backend.write_count(), 0);
    assert_eq!(state.items().len(), 2);
}

#[tokio::test]
async fn submit_prepends_confirmed_record() {
    let (backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();

    let record = state
        .submit(&board, &ctx("alice", false), draft("Daegu"), today())
        .await
        .unwrap()
        .clone();

    assert_eq!(record.nickname, "Alice");
    assert_eq!(record.stage, GrowthStage::Bloom);
    assert_eq!(state.items()[0].id, record.id);
    assert_eq!(backend.write_count(), 1);
}

#[tokio::test]
async fn submit_with_photo_uploads_under_author_folder() {
    let (backend, board) = setup().await;
    let mut d = draft("Jinhae");
    d.photo = Some(PhotoUpload {
        bytes: vec![0xFF, 0xD8, 0xFF],
        content_type: "image/jpeg".to_string(),
    });

    let record = board.submit(&ctx("bob", false), d, today()).await.unwrap();

    let paths = backend.photo_paths().await;
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with("bob/"));
    assert!(paths[0].ends_with(".jpg"));
    assert!(record.photo_url.unwrap().contains(&paths[0]));
}

#[tokio::test]
async fn non_author_cannot_delete() {
    let (backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();

    let err = state.delete(&board, &ctx("bob", false), "s1").await.unwrap_err();

    assert!(matches!(err, BoardError::Forbidden(_)));
    assert_eq!(backend.write_count(), 0);
    assert!(state.find("s1").is_some());
}

#[tokio::test]
async fn privileged_user_can_delete_any_sighting() {
    let (_backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();

    state.delete(&board, &ctx("mod", true), "s1").await.unwrap();

    assert!(state.find("s1").is_none());
    assert!(board.lookup("s1").await.unwrap().is_none());
}

#[tokio::test]
async fn failed_remote_delete_leaves_local_state_unchanged() {
    let (backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();
    let before = state.items().to_vec();

    backend.fail_writes(true);
    let err = state.delete(&board, &ctx("alice", false), "s1").await.unwrap_err();

    assert!(matches!(err, BoardError::Backend(_)));
    assert_eq!(state.items(), before.as_slice());
}

#[tokio::test]
async fn failed_remote_submit_leaves_local_state_unchanged() {
    let (backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();

    backend.fail_writes(true);
    let result = state
        .submit(&board, &ctx("alice", false), draft("Busan"), today())
        .await;

    assert!(result.is_err());
    assert_eq!(state.items().len(), 2);
}

#[tokio::test]
async fn only_author_can_edit_note() {
    let (_backend, board) = setup().await;
    let mut state = BoardState::load(&board).await.unwrap();

    let err = state
        .edit_note(&board, &ctx("mod", true), "s1", Some("hijacked".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::Forbidden(_)));

    state
        .edit_note(&board, &ctx("alice", false), "s1", Some("  petals falling  ".into()))
        .await
        .unwrap();
    assert_eq!(state.find("s1").unwrap().note.as_deref(), Some("petals falling"));
}

#[tokio::test]
async fn missing_sighting_is_not_found() {
    let (_backend, board) = setup().await;

    assert!(board.lookup("nope").await.unwrap().is_none());
    let err = board.delete(&ctx("alice", false), "nope").await.unwrap_err();
    assert!(matches!(err, BoardError::NotFound(_)));
}

#[tokio::test]
async fn list_applies_filter() {
    let (_backend, board) = setup().await;
    let filter = SightingFilter {
        query: Some("bob".to_string()),
        ..Default::default()
    };

    let found = board.list(&filter).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "s2");
}

#[tokio::test]
async fn leaderboard_counts_reports() {
    let (backend, board) = setup().await;
    backend.seed(sighting("s3", "alice", "Alice", 5)).await;

    let leaders = board.leaderboard().await.unwrap();

    assert_eq!(leaders[0].user_id, "alice");
    assert_eq!(leaders[0].reports, 2);
    assert_eq!(leaders[0].points, 20);
    assert_eq!(leaders[0].rank, 1);
    assert_eq!(leaders[0].badge, Badge::Novice);
    assert_eq!(leaders[1].rank, 2);
}

#[tokio::test]
async fn session_privilege_comes_from_profile() {
    let (_backend, board) = setup().await;

    let admin = board.session_for("mod", None).await.unwrap();
    assert!(admin.is_privileged);
    assert_eq!(admin.display_name, "Moderator");

    let stranger = board.session_for("carol", Some("Carol")).await.unwrap();
    assert!(!stranger.is_privileged);
    assert_eq!(stranger.display_name, "Carol");
}

#[tokio::test]
async fn role_changes_require_privilege() {
    let (_backend, board) = setup().await;

    let err = board.toggle_role(&ctx("alice", false), "bob").await.unwrap_err();
    assert!(matches!(err, BoardError::Forbidden(_)));

    let updated = board.toggle_role(&ctx("mod", true), "bob").await.unwrap();
    assert_eq!(updated.role, Role::Admin);

    let profiles = board.profiles(&ctx("mod", true)).await.unwrap();
    let alice = profiles.iter().find(|p| p.profile.user_id == "alice").unwrap();
    assert_eq!(alice.reports, 1);
    assert_eq!(alice.points, 10);
}

#[tokio::test]
async fn nickname_change_propagates_to_sightings() {
    let (_backend, board) = setup().await;

    let profile = board
        .update_nickname(&ctx("alice", false), " Blossom ")
        .await
        .unwrap();
    assert_eq!(profile.nickname, "Blossom");

    let s1 = board.lookup("s1").await.unwrap().unwrap();
    assert_eq!(s1.nickname, "Blossom");
}

#[tokio::test]
async fn own_profile_carries_report_counts() {
    let (_backend, board) = setup().await;

    let mine = board.own_profile(&ctx("bob", false)).await.unwrap();
    assert_eq!(mine.profile.nickname, "Bob");
    assert_eq!(mine.reports, 1);
    assert_eq!(mine.points, 10);

    let err = board.own_profile(&ctx("carol", false)).await.unwrap_err();
    assert!(matches!(err, BoardError::NotFound(_)));
}

#[tokio::test]
async fn list_filters_by_author() {
    let (_backend, board) = setup().await;
    let filter = SightingFilter {
        author: Some("alice".to_string()),
        ..Default::default()
    };

    let found = board.list(&filter).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].user_id, "alice");
}
