use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Application, ApplicationId, ApplicationPatch, ColumnId, NewApplication};
use super::drag::{DropOutcome, DropTarget};
use super::keyboard::DragKey;
use super::layout::ViewportClass;
use super::session::{BoardSession, BoardView};
use super::store::BoardError;
use crate::error::AppError;

/// The single board, shared by every request handler.
pub type SharedBoard = Arc<Mutex<BoardSession>>;

pub fn shared_board(session: BoardSession) -> SharedBoard {
    Arc::new(Mutex::new(session))
}

fn lock(board: &SharedBoard) -> MutexGuard<'_, BoardSession> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Deserialize)]
pub struct DragStartRequest {
    pub application_id: ApplicationId,
}

/// Drop targets arrive as raw droppable ids; `None` means released nowhere.
#[derive(Debug, Default, Deserialize)]
pub struct DragTargetRequest {
    #[serde(default)]
    pub target: Option<String>,
}

impl DragTargetRequest {
    fn into_target(self) -> Option<DropTarget> {
        self.target.as_deref().map(DropTarget::from_raw)
    }
}

#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: DragKey,
    #[serde(default)]
    pub focused: Option<ApplicationId>,
}

#[derive(Debug, Serialize)]
pub struct KeyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DropOutcome>,
    pub lifted: bool,
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    pub stage: ColumnId,
}

#[derive(Debug, Deserialize)]
pub struct ViewportRequest {
    pub width: u32,
}

#[derive(Debug, Serialize)]
pub struct ViewportResponse {
    pub viewport: ViewportClass,
    pub changed: bool,
}

/// Router exposing the board's gesture, selection, and edit operations.
pub fn board_router(board: SharedBoard) -> Router {
    Router::new()
        .route("/api/v1/board", get(view_handler))
        .route("/api/v1/board/drag/start", post(drag_start_handler))
        .route("/api/v1/board/drag/over", post(drag_over_handler))
        .route("/api/v1/board/drag/end", post(drag_end_handler))
        .route("/api/v1/board/drag/cancel", post(drag_cancel_handler))
        .route("/api/v1/board/keys", post(key_handler))
        .route(
            "/api/v1/board/columns/:column_id/applications",
            post(add_handler),
        )
        .route(
            "/api/v1/board/applications/:application_id",
            patch(update_handler),
        )
        .route(
            "/api/v1/board/applications/:application_id/select",
            post(select_handler),
        )
        .route("/api/v1/board/details/close", post(close_handler))
        .route("/api/v1/board/details/edit", post(begin_edit_handler))
        .route("/api/v1/board/details/draft", patch(draft_handler))
        .route("/api/v1/board/details/save", post(save_handler))
        .route("/api/v1/board/details/cancel", post(cancel_edit_handler))
        .route("/api/v1/board/stage", put(stage_handler))
        .route("/api/v1/board/viewport", put(viewport_handler))
        .with_state(board)
}

pub(crate) async fn view_handler(State(board): State<SharedBoard>) -> Json<BoardView> {
    Json(lock(&board).view())
}

pub(crate) async fn drag_start_handler(
    State(board): State<SharedBoard>,
    Json(request): Json<DragStartRequest>,
) -> StatusCode {
    lock(&board).drag_start(request.application_id);
    StatusCode::ACCEPTED
}

pub(crate) async fn drag_over_handler(
    State(board): State<SharedBoard>,
    Json(request): Json<DragTargetRequest>,
) -> StatusCode {
    lock(&board).drag_over(request.into_target());
    StatusCode::ACCEPTED
}

pub(crate) async fn drag_end_handler(
    State(board): State<SharedBoard>,
    Json(request): Json<DragTargetRequest>,
) -> Json<DropOutcome> {
    Json(lock(&board).drag_end(request.into_target()))
}

pub(crate) async fn drag_cancel_handler(State(board): State<SharedBoard>) -> StatusCode {
    lock(&board).drag_cancel();
    StatusCode::NO_CONTENT
}

pub(crate) async fn key_handler(
    State(board): State<SharedBoard>,
    Json(request): Json<KeyRequest>,
) -> Json<KeyResponse> {
    let mut session = lock(&board);
    let outcome = session.press_key(request.key, request.focused.as_ref());
    Json(KeyResponse {
        outcome,
        lifted: session.keyboard().is_lifted(),
    })
}

pub(crate) async fn add_handler(
    State(board): State<SharedBoard>,
    Path(column_id): Path<String>,
    Json(fields): Json<NewApplication>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let column = column_id.parse::<ColumnId>().map_err(BoardError::from)?;
    let created = lock(&board).add_application(column, fields);
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn update_handler(
    State(board): State<SharedBoard>,
    Path(application_id): Path<String>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<Application>, AppError> {
    let id = ApplicationId(application_id);
    let updated = lock(&board).apply_edit(&id, &patch)?;
    Ok(Json(updated))
}

pub(crate) async fn select_handler(
    State(board): State<SharedBoard>,
    Path(application_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ApplicationId(application_id);
    let mut session = lock(&board);
    let response = match session.click(&id)? {
        Some(application) => (StatusCode::OK, Json(application.clone())).into_response(),
        None => (
            StatusCode::ACCEPTED,
            Json(json!({ "status": "ignored", "reason": "drag in progress" })),
        )
            .into_response(),
    };
    Ok(response)
}

pub(crate) async fn close_handler(State(board): State<SharedBoard>) -> StatusCode {
    lock(&board).close_details();
    StatusCode::NO_CONTENT
}

pub(crate) async fn begin_edit_handler(State(board): State<SharedBoard>) -> Response {
    let mut session = lock(&board);
    if !session.begin_edit() {
        let payload = json!({ "error": "no application selected" });
        return (StatusCode::CONFLICT, Json(payload)).into_response();
    }
    Json(session.view()).into_response()
}

pub(crate) async fn draft_handler(
    State(board): State<SharedBoard>,
    Json(patch): Json<ApplicationPatch>,
) -> Response {
    let mut session = lock(&board);
    if !session.edit_draft(|draft| patch.apply_to(draft)) {
        let payload = json!({ "error": "not editing" });
        return (StatusCode::CONFLICT, Json(payload)).into_response();
    }
    Json(session.view()).into_response()
}

pub(crate) async fn save_handler(State(board): State<SharedBoard>) -> Result<Response, AppError> {
    let mut session = lock(&board);
    let response = match session.save_edit()? {
        Some(application) => (StatusCode::OK, Json(application)).into_response(),
        None => {
            let payload = json!({ "error": "not editing" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
    };
    Ok(response)
}

pub(crate) async fn cancel_edit_handler(State(board): State<SharedBoard>) -> Json<BoardView> {
    let mut session = lock(&board);
    session.cancel_edit();
    Json(session.view())
}

pub(crate) async fn stage_handler(
    State(board): State<SharedBoard>,
    Json(request): Json<StageRequest>,
) -> Json<BoardView> {
    let mut session = lock(&board);
    session.select_stage(request.stage);
    Json(session.view())
}

pub(crate) async fn viewport_handler(
    State(board): State<SharedBoard>,
    Json(request): Json<ViewportRequest>,
) -> Json<ViewportResponse> {
    let mut session = lock(&board);
    let changed = session.resize(request.width).is_some();
    Json(ViewportResponse {
        viewport: session.viewport(),
        changed,
    })
}
