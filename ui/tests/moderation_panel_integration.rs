//! Integration tests for the moderation panel.
//!
//! These tests verify that:
//! 1. A spinner replaces the list while users are loading
//! 2. Criteria changes narrow the rendered rows and the user count
//! 3. Edit mode only closes after a confirmed role change
//! 4. Status toggles go straight to the command collaborator

mod common;

use common::{TOKEN, TestCtx};
use http::StatusCode;
use kittest::Queryable;
use moderation_business::testing::{RecordedCall, RoleReply};
use moderation_business::{Role, RoleFilter, StatusFilter, UserId, UserStatus};
use moderation_ui::widgets::{UP_TO_DATE_TEXT, UPDATING_TEXT};

#[test]
fn test_loading_hides_rows() {
    let mut ctx = TestCtx::loading();
    let harness = ctx.harness_mut();
    harness.step();

    assert!(harness.query_by_label("0 users").is_some());
    assert!(harness.query_by_label(UPDATING_TEXT).is_some());
    assert!(harness.query_by_label_contains("alice").is_none());
}

#[test]
fn test_loaded_users_are_listed_in_order() {
    let mut ctx = TestCtx::loaded();
    let harness = ctx.harness_mut();
    harness.step();
    harness.step();

    assert!(harness.query_by_label("3 users").is_some());
    assert!(harness.query_by_label("Alice").is_some());
    assert!(harness.query_by_label("bob@x.com").is_some());
    assert!(harness.query_by_label("Carol").is_some());
    assert!(harness.query_by_label(UP_TO_DATE_TEXT).is_some());
}

#[test]
fn test_search_narrows_rows_and_count() {
    let mut ctx = TestCtx::loaded();
    let harness = ctx.harness_mut();
    harness.step();

    harness.state_mut().set_search_text("  CAROL");
    harness.step();

    assert!(harness.query_by_label("1 user").is_some());
    assert!(harness.query_by_label("Carol").is_some());
    assert!(harness.query_by_label("bob@x.com").is_none());
}

#[test]
fn test_status_and_role_filters_combine() {
    let mut ctx = TestCtx::loaded();
    let harness = ctx.harness_mut();
    harness.step();

    harness.state_mut().set_status_filter(StatusFilter::Active);
    harness.state_mut().set_role_filter(RoleFilter::Only(Role::User));
    harness.step();

    assert!(harness.query_by_label("0 users").is_some());
    assert!(harness.query_by_label("Alice").is_none());
    assert!(harness.query_by_label("bob@x.com").is_none());
}

#[test]
fn test_cancel_leaves_edit_mode() {
    let mut ctx = TestCtx::loaded();
    let harness = ctx.harness_mut();
    harness.step();

    harness.state_mut().begin_edit(UserId(3));
    harness.step();
    assert!(harness.query_by_label("Save").is_some());

    harness.get_by_label("Cancel").click();
    harness.step();
    harness.step();

    assert!(harness.query_by_label("Save").is_none());
    assert!(!harness.state().edit_modes().is_editing(UserId(3)));
}

#[tokio::test]
async fn test_confirmed_role_change_closes_edit_mode() {
    let mut ctx = TestCtx::loaded();
    let harness = ctx.harness_mut();
    harness.step();

    harness.state_mut().begin_edit(UserId(2));
    harness.state_mut().set_draft(UserId(2), Role::Moderator);
    harness.step();

    harness.get_by_label("Save").click();
    harness.step();
    harness.state_mut().settle().await;
    harness.step();

    assert!(harness.query_by_label("Save").is_none());
    assert_eq!(
        harness.state().list().user(UserId(2)).map(|user| user.role),
        Some(Role::Moderator)
    );
}

#[tokio::test]
async fn test_rejected_role_change_keeps_edit_mode() {
    let mut ctx = TestCtx::loaded();
    ctx.commands
        .script_role(RoleReply::Status(StatusCode::UNPROCESSABLE_ENTITY));
    let harness = ctx.harness_mut();
    harness.step();

    harness.state_mut().begin_edit(UserId(2));
    harness.step();

    harness.get_by_label("Save").click();
    harness.step();
    harness.state_mut().settle().await;
    harness.step();

    assert!(harness.query_by_label("Save").is_some());
    assert!(harness.state().edit_modes().is_editing(UserId(2)));
}

#[test]
fn test_unblock_sends_status_change() {
    let mut ctx = TestCtx::loaded();
    {
        let harness = ctx.harness_mut();
        harness.step();
        harness.step();

        // Only bob is blocked.
        harness.get_by_label("Unblock").click();
        harness.step();
    }

    assert_eq!(
        ctx.commands.calls(),
        vec![RecordedCall::Status {
            id: UserId(2),
            status: UserStatus::Active,
            credential: TOKEN.to_owned(),
        }]
    );
}

#[test]
fn test_save_without_runtime_keeps_edit_mode() {
    let mut ctx = TestCtx::loaded();
    {
        let harness = ctx.harness_mut();
        harness.step();

        harness.state_mut().begin_edit(UserId(3));
        harness.step();

        harness.get_by_label("Save").click();
        harness.step();
        harness.step();

        assert!(harness.query_by_label("Save").is_some());
        assert!(harness.state().edit_modes().is_editing(UserId(3)));
    }

    assert!(ctx.commands.calls().is_empty());
}
