use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::board::{
    Application, ApplicationId, BoardSession, BoardStore, ColumnId, FixedClock, Priority,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 15).expect("valid date")
}

/// Sample pipeline with a pinned clock.
pub(super) fn sample_store() -> BoardStore {
    BoardStore::sample()
        .expect("sample ids are unique")
        .with_clock(FixedClock(today()))
}

pub(super) fn sample_session() -> BoardSession {
    BoardSession::new(sample_store())
}

pub(super) fn application(id: &str, column: ColumnId) -> Application {
    Application {
        id: ApplicationId::from(id),
        title: format!("Candidate {id}"),
        description: "Imported from referral".to_string(),
        priority: Priority::Low,
        due_date: NaiveDate::from_ymd_opt(2024, 11, 1).expect("valid date"),
        status: "Review CV".to_string(),
        column_id: column,
    }
}

/// Board with `ids` placed in `column`, in order.
pub(super) fn store_with(column: ColumnId, ids: &[&str]) -> BoardStore {
    BoardStore::from_applications(ids.iter().map(|id| application(id, column)))
        .expect("ids are unique")
        .with_clock(FixedClock(today()))
}

pub(super) fn ids(store: &BoardStore, column: ColumnId) -> Vec<String> {
    store
        .column(column)
        .applications
        .iter()
        .map(|application| application.id.to_string())
        .collect()
}

pub(super) fn all_ids(store: &BoardStore) -> Vec<String> {
    let mut ids: Vec<String> = store
        .columns()
        .iter()
        .flat_map(|column| column.applications.iter())
        .map(|application| application.id.to_string())
        .collect();
    ids.sort();
    ids
}

pub(super) fn assert_consistent(store: &BoardStore) {
    if let Err(violation) = store.verify() {
        panic!("board invariant broken: {violation}");
    }
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
