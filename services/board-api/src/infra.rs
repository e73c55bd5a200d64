use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use pipeline_board::board::{BoardSession, BoardStore, FixedClock};
use pipeline_board::config::BoardConfig;
use pipeline_board::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the board described by `config`, pinning "today" when asked to.
pub(crate) fn board_session(
    config: &BoardConfig,
    today: Option<NaiveDate>,
) -> Result<BoardSession, AppError> {
    let store: BoardStore = config.build_store()?;
    let store = match today {
        Some(date) => store.with_clock(FixedClock(date)),
        None => store,
    };
    Ok(BoardSession::new(store))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
