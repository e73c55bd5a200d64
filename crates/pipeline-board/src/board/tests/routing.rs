use axum::extract::State;
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::board::router::{view_handler, SharedBoard};
use crate::board::{board_router, shared_board, ApplicationId, ColumnId};

fn board() -> SharedBoard {
    shared_board(sample_session())
}

#[tokio::test]
async fn view_handler_serializes_every_stage() {
    let axum::Json(view) = view_handler(State(board())).await;

    assert_eq!(view.columns.len(), ColumnId::COUNT);
    assert_eq!(view.columns[0].applications[0].id, ApplicationId::from("1"));
}

#[tokio::test]
async fn board_route_returns_camel_case_cards() {
    let response = board_router(board())
        .oneshot(empty_request(Method::GET, "/api/v1/board"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["viewport"], "wide");
    assert_eq!(body["columns"][0]["id"], "long-list");
    assert_eq!(body["columns"][0]["applications"][0]["columnId"], "long-list");
    assert_eq!(body["columns"][0]["applications"][0]["dueDate"], "2024-10-20");
    assert_eq!(body["stages"][6]["count"], 1);
}

#[tokio::test]
async fn drag_routes_move_a_card_by_raw_ids() {
    let shared = board();
    let router = board_router(shared.clone());

    let started = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/board/drag/start",
            json!({ "application_id": "1" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(started.status(), StatusCode::ACCEPTED);

    let ended = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/board/drag/end",
            json!({ "target": "interview" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(ended.status(), StatusCode::OK);
    let outcome = read_json_body(ended).await;
    assert_eq!(outcome["outcome"], "moved");
    assert_eq!(outcome["destination"], "interview");
    assert_eq!(outcome["index"], 2);

    let session = shared.lock().expect("board mutex poisoned");
    assert_eq!(
        ids(session.store(), ColumnId::Interview),
        vec!["3", "10", "1"]
    );
}

#[tokio::test]
async fn drag_end_without_a_gesture_is_reported_as_ignored() {
    let response = board_router(board())
        .oneshot(json_request(Method::POST, "/api/v1/board/drag/end", json!({})))
        .await
        .expect("router responds");

    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "ignored");
    assert_eq!(body["reason"], "not_dragging");
}

#[tokio::test]
async fn selecting_an_unknown_card_is_not_found() {
    let response = board_router(board())
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/board/applications/ghost/select",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("ghost")));
}

#[tokio::test]
async fn adding_to_a_stage_returns_the_new_card() {
    let response = board_router(board())
        .oneshot(json_request(
            Method::POST,
            "/api/v1/board/columns/offer/applications",
            json!({ "title": "Grace Hopper - Staff Engineer", "priority": "high" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["columnId"], "offer");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["status"], "New");
    assert_eq!(body["dueDate"], "2024-10-22");
}

#[tokio::test]
async fn adding_to_an_unknown_stage_is_not_found() {
    let response = board_router(board())
        .oneshot(json_request(
            Method::POST,
            "/api/v1/board/columns/archive/applications",
            json!({}),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patching_a_card_keeps_its_stage() {
    let response = board_router(board())
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/board/applications/3",
            json!({ "status": "Hired" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "Hired");
    assert_eq!(body["columnId"], "interview");
}

#[tokio::test]
async fn narrow_viewport_with_stage_shows_one_column() {
    let router = board_router(board());

    let resized = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/board/viewport",
            json!({ "width": 390 }),
        ))
        .await
        .expect("router responds");
    let body = read_json_body(resized).await;
    assert_eq!(body["viewport"], "narrow");
    assert_eq!(body["changed"], true);

    let staged = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/board/stage",
            json!({ "stage": "interview" }),
        ))
        .await
        .expect("router responds");
    let view = read_json_body(staged).await;
    let columns = view["columns"].as_array().expect("columns array");
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0]["id"], "interview");
}

#[tokio::test]
async fn editing_without_selection_conflicts() {
    let router = board_router(board());

    let edit = router
        .clone()
        .oneshot(empty_request(Method::POST, "/api/v1/board/details/edit"))
        .await
        .expect("router responds");
    assert_eq!(edit.status(), StatusCode::CONFLICT);

    let save = router
        .oneshot(empty_request(Method::POST, "/api/v1/board/details/save"))
        .await
        .expect("router responds");
    assert_eq!(save.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn details_edit_round_trip_over_http() {
    let router = board_router(board());

    for (method, uri, body) in [
        (Method::POST, "/api/v1/board/applications/4/select", None),
        (Method::POST, "/api/v1/board/details/edit", None),
        (
            Method::PATCH,
            "/api/v1/board/details/draft",
            Some(json!({ "status": "Offer signed" })),
        ),
    ] {
        let request = match body {
            Some(body) => json_request(method, uri, body),
            None => empty_request(method, uri),
        };
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let saved = router
        .oneshot(empty_request(Method::POST, "/api/v1/board/details/save"))
        .await
        .expect("router responds");
    assert_eq!(saved.status(), StatusCode::OK);
    let body = read_json_body(saved).await;
    assert_eq!(body["status"], "Offer signed");
    assert_eq!(body["columnId"], "offer");
}

#[tokio::test]
async fn key_route_reports_the_keyboard_lift() {
    let router = board_router(board());

    let lifted = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/board/keys",
            json!({ "key": "activate", "focused": "1" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(read_json_body(lifted).await["lifted"], true);

    let cancelled = router
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/board/drag/end", json!({})))
        .await
        .expect("router responds");
    assert_eq!(read_json_body(cancelled).await["outcome"], "cancelled");

    let relifted = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/board/keys",
            json!({ "key": "activate", "focused": "2" }),
        ))
        .await
        .expect("router responds");
    let body = read_json_body(relifted).await;
    assert_eq!(body["lifted"], true);
    assert!(body.get("outcome").is_none());
}
