use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, info};

use super::domain::{
    Application, ApplicationId, ApplicationPatch, Column, ColumnId, NewApplication, StageSummary,
    UnknownColumn,
};

/// Default offset applied to the due date of freshly added cards.
pub const DEFAULT_DUE_IN_DAYS: i64 = 7;

/// Source of "today" so due-date defaults stay testable.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Failures reported by board operations. Every failing operation leaves the
/// board untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("application '{0}' not found")]
    ApplicationNotFound(ApplicationId),
    #[error("application '{application}' is not in stage '{column}'")]
    NotInColumn {
        application: ApplicationId,
        column: ColumnId,
    },
    #[error("application id '{0}' is already on the board")]
    DuplicateApplication(ApplicationId),
    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumn),
}

impl BoardError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BoardError::ApplicationNotFound(_)
                | BoardError::NotInColumn { .. }
                | BoardError::UnknownColumn(_)
        )
    }
}

/// Structural problems found by [`BoardStore::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("expected stage '{expected}' at position {position}, found '{found}'")]
    ColumnOrder {
        position: usize,
        expected: ColumnId,
        found: ColumnId,
    },
    #[error("expected {expected} stages, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("application '{application}' sits in '{column}' but records '{recorded}'")]
    ColumnMismatch {
        application: ApplicationId,
        column: ColumnId,
        recorded: ColumnId,
    },
    #[error("application '{0}' appears more than once")]
    Duplicate(ApplicationId),
}

/// Moves the element at `from` to `to`, shifting everything in between by one.
/// Indices past the end are clamped to the last element. Returns whether the
/// sequence changed.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    let Some(last) = items.len().checked_sub(1) else {
        return false;
    };
    let from = from.min(last);
    let to = to.min(last);
    if from == to {
        return false;
    }

    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Owner of the column to application structure. Every operation either
/// completes in full or leaves the board as it was.
pub struct BoardStore {
    columns: Vec<Column>,
    next_sequence: u64,
    due_in_days: i64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardStore")
            .field("columns", &self.columns)
            .field("next_sequence", &self.next_sequence)
            .field("due_in_days", &self.due_in_days)
            .finish_non_exhaustive()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Board with all seven stages and no cards.
    pub fn new() -> Self {
        Self {
            columns: ColumnId::ordered().into_iter().map(Column::empty).collect(),
            next_sequence: 0,
            due_in_days: DEFAULT_DUE_IN_DAYS,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builds a board from cards whose `column_id` decides their stage. Cards
    /// keep their relative order within a stage.
    pub fn from_applications(
        applications: impl IntoIterator<Item = Application>,
    ) -> Result<Self, BoardError> {
        let mut store = Self::new();
        let mut seen = HashSet::new();

        for application in applications {
            if !seen.insert(application.id.clone()) {
                return Err(BoardError::DuplicateApplication(application.id));
            }
            let position = application.column_id.position();
            store.columns[position].applications.push(application);
        }

        Ok(store)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_due_in_days(mut self, days: i64) -> Self {
        self.due_in_days = days;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.position()]
    }

    /// Owned copy of the current board for readers outside the event loop.
    pub fn snapshot(&self) -> Vec<Column> {
        self.columns.clone()
    }

    pub fn locate(&self, id: &ApplicationId) -> Option<(ColumnId, usize)> {
        self.columns.iter().find_map(|column| {
            column
                .position_of(id)
                .map(|position| (column.id, position))
        })
    }

    pub fn column_of(&self, id: &ApplicationId) -> Option<ColumnId> {
        self.locate(id).map(|(column, _)| column)
    }

    pub fn find_application(&self, id: &ApplicationId) -> Option<&Application> {
        self.locate(id)
            .map(|(column, position)| &self.column(column).applications[position])
    }

    pub fn application_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn stage_summaries(&self) -> Vec<StageSummary> {
        self.columns
            .iter()
            .map(|column| StageSummary {
                id: column.id,
                title: column.title.clone(),
                count: column.len(),
            })
            .collect()
    }

    /// Moves the card at `from` to `to` inside one stage. Out-of-range indices
    /// are clamped. Returns whether the order changed.
    pub fn reorder_within_column(&mut self, column: ColumnId, from: usize, to: usize) -> bool {
        let applications = &mut self.columns[column.position()].applications;
        let changed = array_move(applications, from, to);

        if changed {
            info!(%column, from, to, "reordered application within stage");
        } else {
            debug!(%column, from, to, "reorder left stage unchanged");
        }
        changed
    }

    /// Relocates a card from `source` into `destination` at `index`, or at the
    /// end when no index is given. Returns the card's final position.
    pub fn move_between_columns(
        &mut self,
        id: &ApplicationId,
        source: ColumnId,
        destination: ColumnId,
        index: Option<usize>,
    ) -> Result<usize, BoardError> {
        let from = self
            .column(source)
            .position_of(id)
            .ok_or_else(|| BoardError::NotInColumn {
                application: id.clone(),
                column: source,
            })?;

        if source == destination {
            let last = self.column(source).len() - 1;
            let to = index.unwrap_or(last).min(last);
            self.reorder_within_column(source, from, to);
            return Ok(to);
        }

        let mut application = self.columns[source.position()].applications.remove(from);
        application.column_id = destination;

        let target = &mut self.columns[destination.position()].applications;
        let to = index.unwrap_or(target.len()).min(target.len());
        target.insert(to, application);

        info!(application = %id, %source, %destination, index = to, "moved application between stages");
        Ok(to)
    }

    /// Appends a new card to `column`, filling unspecified fields with defaults.
    pub fn add_application(&mut self, column: ColumnId, fields: NewApplication) -> Application {
        let id = self.next_application_id();
        let due_date = fields.due_date.unwrap_or_else(|| self.default_due_date());

        let application = Application {
            id,
            title: fields
                .title
                .unwrap_or_else(|| "New Application".to_string()),
            description: fields
                .description
                .unwrap_or_else(|| "Description here".to_string()),
            priority: fields.priority.unwrap_or_default(),
            due_date,
            status: fields.status.unwrap_or_else(|| "New".to_string()),
            column_id: column,
        };

        self.columns[column.position()]
            .applications
            .push(application.clone());

        info!(application = %application.id, %column, "added application");
        application
    }

    /// Merges `patch` over the card in place and returns the updated card.
    pub fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<Application, BoardError> {
        let (column, position) = self
            .locate(id)
            .ok_or_else(|| BoardError::ApplicationNotFound(id.clone()))?;

        let application = &mut self.columns[column.position()].applications[position];
        patch.apply_to(application);

        info!(application = %id, %column, "updated application fields");
        Ok(application.clone())
    }

    /// Checks the structural invariants of the board.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        if self.columns.len() != ColumnId::COUNT {
            return Err(InvariantViolation::ColumnCount {
                expected: ColumnId::COUNT,
                found: self.columns.len(),
            });
        }

        let mut seen = HashSet::new();
        for (position, (column, expected)) in
            self.columns.iter().zip(ColumnId::ordered()).enumerate()
        {
            if column.id != expected {
                return Err(InvariantViolation::ColumnOrder {
                    position,
                    expected,
                    found: column.id,
                });
            }

            for application in &column.applications {
                if application.column_id != column.id {
                    return Err(InvariantViolation::ColumnMismatch {
                        application: application.id.clone(),
                        column: column.id,
                        recorded: application.column_id,
                    });
                }
                if !seen.insert(&application.id) {
                    return Err(InvariantViolation::Duplicate(application.id.clone()));
                }
            }
        }

        Ok(())
    }

    /// Today plus the configured offset, or today when the offset leaves the
    /// calendar range.
    fn default_due_date(&self) -> NaiveDate {
        let today = self.today();
        Duration::try_days(self.due_in_days)
            .and_then(|offset| today.checked_add_signed(offset))
            .unwrap_or_else(|| {
                debug!(days = self.due_in_days, "due date offset out of range");
                today
            })
    }

    fn next_application_id(&mut self) -> ApplicationId {
        loop {
            self.next_sequence += 1;
            let candidate = ApplicationId(format!("app-{:06}", self.next_sequence));
            if self.locate(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
