use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applications placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Recruitment stages, in the fixed order they are displayed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    LongList,
    ShortList,
    Interview,
    Offer,
    Compliance,
    Onboarding,
    Hired,
}

impl ColumnId {
    pub const COUNT: usize = 7;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::LongList,
            Self::ShortList,
            Self::Interview,
            Self::Offer,
            Self::Compliance,
            Self::Onboarding,
            Self::Hired,
        ]
    }

    /// Position of the stage in display order.
    pub const fn position(self) -> usize {
        match self {
            Self::LongList => 0,
            Self::ShortList => 1,
            Self::Interview => 2,
            Self::Offer => 3,
            Self::Compliance => 4,
            Self::Onboarding => 5,
            Self::Hired => 6,
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::LongList => "long-list",
            Self::ShortList => "short-list",
            Self::Interview => "interview",
            Self::Offer => "offer",
            Self::Compliance => "compliance",
            Self::Onboarding => "onboarding",
            Self::Hired => "hired",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::LongList => "Long List",
            Self::ShortList => "Short List",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Compliance => "Compliance",
            Self::Onboarding => "Onboarding",
            Self::Hired => "Hired",
        }
    }

    /// Lowercase label used when no column title is at hand, e.g. "long list".
    pub fn spaced_label(self) -> String {
        self.slug().replace('-', " ")
    }

    pub fn previous(self) -> Option<Self> {
        self.position()
            .checked_sub(1)
            .map(|index| Self::ordered()[index])
    }

    pub fn next(self) -> Option<Self> {
        Self::ordered().get(self.position() + 1).copied()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage '{0}'")]
pub struct UnknownColumn(pub String);

impl FromStr for ColumnId {
    type Err = UnknownColumn;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|column| column.slug().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownColumn(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A candidate card. `column_id` is denormalized and always agrees with the
/// column whose sequence holds the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub status: String,
    pub column_id: ColumnId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub applications: Vec<Application>,
}

impl Column {
    pub fn empty(id: ColumnId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            applications: Vec::new(),
        }
    }

    pub fn position_of(&self, id: &ApplicationId) -> Option<usize> {
        self.applications
            .iter()
            .position(|application| &application.id == id)
    }

    pub fn contains(&self, id: &ApplicationId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

/// Field values supplied when a new card is added. Missing values fall back to
/// the board defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewApplication {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl NewApplication {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Shallow patch over the editable fields. Identity and stage are
/// absent: relocation only happens through a move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ApplicationPatch {
    pub fn status(value: impl Into<String>) -> Self {
        Self {
            status: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch carrying every editable field of `application`.
    pub fn from_application(application: &Application) -> Self {
        Self {
            title: Some(application.title.clone()),
            description: Some(application.description.clone()),
            priority: Some(application.priority),
            due_date: Some(application.due_date),
            status: Some(application.status.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(&self, application: &mut Application) {
        if let Some(title) = &self.title {
            application.title = title.clone();
        }
        if let Some(description) = &self.description {
            application.description = description.clone();
        }
        if let Some(priority) = self.priority {
            application.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            application.due_date = due_date;
        }
        if let Some(status) = &self.status {
            application.status = status.clone();
        }
    }
}

/// Count entry used by the compact stage selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub id: ColumnId,
    pub title: String,
    pub count: usize,
}

impl StageSummary {
    pub fn count_label(&self) -> String {
        match self.count {
            1 => "1 candidate".to_string(),
            count => format!("{count} candidates"),
        }
    }
}
