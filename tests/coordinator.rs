mod common;

use std::sync::Arc;

use common::{
    CLASS_10A, CLASS_10B, Call, MockApi, SUBJECT_PHYSICS, TEACHER_ADA, TEACHER_ALAN, june,
    lookups, period_id, remote, session,
};
use educonnect::api::Created;
use educonnect::modules::timetable::{
    CreateOutcome, DeleteOutcome, SessionCoordinator, UpdateOutcome, Week,
};
use educonnect::notifications::AutoConfirm;
use educonnect_auth::Viewer;
use educonnect_core::{ClientError, Operation};
use educonnect_models::{
    CreateSessionDto, SessionId, TimetableTarget, UpdateSessionDto,
};

fn coordinator(api: &Arc<MockApi>, viewer: Viewer) -> SessionCoordinator {
    let mut coordinator = SessionCoordinator::new(api.clone(), viewer);
    coordinator.set_lookups(lookups());
    coordinator.replace_all(
        Week::containing(june(3)).query(TimetableTarget::Class(CLASS_10A)),
        vec![
            session(1, june(3), 1, CLASS_10A),
            session(2, june(4), 2, CLASS_10A),
        ],
    );
    coordinator
}

fn complete_draft() -> CreateSessionDto {
    CreateSessionDto {
        date: Some(june(5)),
        period_id: Some(period_id(3)),
        class_id: Some(CLASS_10A),
        teacher_id: Some(TEACHER_ALAN),
        subject_id: Some(SUBJECT_PHYSICS),
        lesson_content: "Optics".into(),
        behavior_note: None,
        absent_count: 0,
    }
}

#[tokio::test]
async fn test_create_with_blank_lesson_never_calls_api() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);

    let draft = CreateSessionDto {
        lesson_content: "   ".into(),
        ..complete_draft()
    };
    let err = coordinator.create(draft).await.unwrap_err();

    assert_eq!(err, ClientError::Validation("lesson content is required".into()));
    assert!(api.calls().is_empty());
    assert_eq!(coordinator.sessions().len(), 2);
}

#[tokio::test]
async fn test_create_appends_returned_record_without_sorting() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let returned = session(9, june(3), 1, CLASS_10A);
    api.respond_to_create(Ok(Created::Session(returned.clone())));

    let outcome = coordinator.create(complete_draft()).await.unwrap();

    assert_eq!(outcome, CreateOutcome::Added(returned.clone()));
    assert_eq!(coordinator.sessions().last(), Some(&returned));
    assert_eq!(coordinator.sessions().len(), 3);
}

#[tokio::test]
async fn test_create_with_bare_id_builds_record_from_lookups() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    api.respond_to_create(Ok(Created::Id(SessionId::from_u128(42))));

    let outcome = coordinator.create(complete_draft()).await.unwrap();

    let CreateOutcome::Added(created) = outcome else {
        panic!("expected a local record");
    };
    assert_eq!(created.session_id, SessionId::from_u128(42));
    assert_eq!(created.period_number, 3);
    assert_eq!(created.class_name, "10A");
    assert_eq!(created.teacher_name, "Alan Turing");
    assert_eq!(created.subject_name, "Physics");
}

#[tokio::test]
async fn test_create_without_record_refetches() {
    let api = Arc::new(MockApi::with_sessions(&[session(7, june(6), 4, CLASS_10A)]));
    let mut coordinator = coordinator(&api, Viewer::Admin);

    let outcome = coordinator.create(complete_draft()).await.unwrap();

    assert_eq!(outcome, CreateOutcome::Refetched);
    assert_eq!(api.fetch_count(), 1);
    assert_eq!(coordinator.sessions().len(), 1);
    assert_eq!(coordinator.sessions()[0].session_id, SessionId::from_u128(7));
}

#[tokio::test]
async fn test_teacher_cannot_create() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Teacher(TEACHER_ADA.into_inner()));

    let err = coordinator.create(complete_draft()).await.unwrap_err();

    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_unchanged_update_makes_no_call() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let original = coordinator.sessions()[1].clone();

    let outcome = coordinator
        .update(original.session_id, UpdateSessionDto::from(&original))
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert!(api.mutation_calls().is_empty());
    assert_eq!(coordinator.sessions()[1], original);
}

#[tokio::test]
async fn test_update_unknown_session_is_not_found() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let dto = UpdateSessionDto::from(&session(99, june(3), 1, CLASS_10A));

    let err = coordinator
        .update(SessionId::from_u128(99), dto)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound { .. }));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_update_acknowledged_is_patched_locally_in_place() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let original = coordinator.sessions()[0].clone();

    let patch = UpdateSessionDto {
        date: june(7),
        period_id: period_id(5),
        subject_id: SUBJECT_PHYSICS,
        lesson_content: "Optics".into(),
        ..UpdateSessionDto::from(&original)
    };
    let outcome = coordinator
        .update(original.session_id, patch.clone())
        .await
        .unwrap();

    let UpdateOutcome::Updated(updated) = outcome else {
        panic!("expected an updated record");
    };
    assert_eq!(updated.date, june(7));
    assert_eq!(updated.period_number, 5);
    assert_eq!(updated.subject_name, "Physics");
    assert_eq!(coordinator.sessions()[0], updated);
    assert_eq!(coordinator.sessions().len(), 2);
    assert_eq!(api.calls(), vec![Call::Update(original.session_id, patch)]);
}

#[tokio::test]
async fn test_update_with_unknown_period_refetches() {
    let api = Arc::new(MockApi::with_sessions(&[session(1, june(3), 1, CLASS_10A)]));
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let original = coordinator.sessions()[0].clone();

    let patch = UpdateSessionDto {
        period_id: period_id(40),
        ..UpdateSessionDto::from(&original)
    };
    let outcome = coordinator.update(original.session_id, patch).await.unwrap();

    assert_eq!(outcome, UpdateOutcome::Refetched);
    assert_eq!(api.fetch_count(), 1);
    assert_eq!(coordinator.sessions().len(), 1);
}

#[tokio::test]
async fn test_teacher_edits_only_own_sessions() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Teacher(TEACHER_ALAN.into_inner()));
    let original = coordinator.sessions()[0].clone();

    let patch = UpdateSessionDto {
        lesson_content: "Something else".into(),
        ..UpdateSessionDto::from(&original)
    };
    let err = coordinator.update(original.session_id, patch).await.unwrap_err();

    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_failed_update_leaves_state_untouched() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let before = coordinator.sessions().to_vec();
    api.respond_to_update(Err(remote(Operation::UpdateSession, 500)));

    let patch = UpdateSessionDto {
        absent_count: 3,
        ..UpdateSessionDto::from(&before[0])
    };
    let err = coordinator.update(before[0].session_id, patch).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to update the session");
    assert_eq!(coordinator.sessions(), before.as_slice());
}

#[tokio::test]
async fn test_declined_delete_makes_no_call() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);

    let outcome = coordinator
        .delete(SessionId::from_u128(1), &AutoConfirm(false))
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert!(api.calls().is_empty());
    assert_eq!(coordinator.sessions().len(), 2);
}

#[tokio::test]
async fn test_confirmed_delete_removes_locally() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);

    let outcome = coordinator
        .delete(SessionId::from_u128(1), &AutoConfirm(true))
        .await
        .unwrap();

    assert!(matches!(outcome, DeleteOutcome::Deleted(ref s) if s.session_id == SessionId::from_u128(1)));
    assert_eq!(api.calls(), vec![Call::Delete(SessionId::from_u128(1))]);
    assert_eq!(coordinator.sessions().len(), 1);
    assert!(coordinator.session(SessionId::from_u128(1)).is_none());
}

#[tokio::test]
async fn test_failed_delete_keeps_session() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    api.respond_to_delete(Err(remote(Operation::DeleteSession, 409)));

    let result = coordinator
        .delete(SessionId::from_u128(2), &AutoConfirm(true))
        .await;

    assert!(result.is_err());
    assert_eq!(coordinator.sessions().len(), 2);
}

#[tokio::test]
async fn test_grid_reflects_mutations() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    api.respond_to_create(Ok(Created::Session(session(5, june(3), 1, CLASS_10B))));

    coordinator.create(complete_draft()).await.unwrap();
    let grid = coordinator.grid();

    let monday = grid.get(chrono::Weekday::Mon, 1);
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[1].class_name, "10B");
}

#[tokio::test]
async fn test_create_reports_success_when_reload_fails() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    api.fail_fetch(remote(Operation::FetchSessions, 500));

    let outcome = coordinator.create(complete_draft()).await.unwrap();

    assert!(matches!(outcome, CreateOutcome::RefetchFailed(ref e) if e.status() == Some(500)));
    assert_eq!(api.mutation_calls().len(), 1);
    assert_eq!(coordinator.sessions().len(), 2);
}

#[tokio::test]
async fn test_session_created_in_another_week_stays_off_the_grid() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let next_tuesday = session(8, june(11), 1, CLASS_10A);
    api.respond_to_create(Ok(Created::Session(next_tuesday.clone())));

    let outcome = coordinator.create(complete_draft()).await.unwrap();

    assert_eq!(outcome, CreateOutcome::Added(next_tuesday));
    assert_eq!(coordinator.sessions().len(), 2);
    assert!(coordinator.grid().get(chrono::Weekday::Tue, 1).is_empty());
}

#[tokio::test]
async fn test_session_created_on_trailing_sunday_is_kept() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    api.respond_to_create(Ok(Created::Session(session(8, june(9), 1, CLASS_10A))));

    coordinator.create(complete_draft()).await.unwrap();

    assert_eq!(coordinator.sessions().len(), 3);
    assert_eq!(coordinator.grid().get(chrono::Weekday::Sun, 1).len(), 1);
}

#[tokio::test]
async fn test_session_rescheduled_to_next_week_leaves_local_list() {
    let api = Arc::new(MockApi::new());
    let mut coordinator = coordinator(&api, Viewer::Admin);
    let original = coordinator.sessions()[1].clone();

    let patch = UpdateSessionDto {
        date: june(11),
        ..UpdateSessionDto::from(&original)
    };
    let outcome = coordinator.update(original.session_id, patch).await.unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated(ref s) if s.date == june(11)));
    assert_eq!(coordinator.sessions().len(), 1);
    assert!(coordinator.session(original.session_id).is_none());
    assert!(coordinator.grid().get(chrono::Weekday::Tue, 2).is_empty());
}
