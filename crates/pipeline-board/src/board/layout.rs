use serde::{Deserialize, Serialize};

use super::domain::{Column, ColumnId};

/// Widths below this are narrow.
pub const NARROW_MAX_WIDTH: u32 = 640;
/// Widths at or above this are wide.
pub const WIDE_MIN_WIDTH: u32 = 1024;
/// Minimum track width for a column in the scrolling arrangement.
pub const SCROLL_COLUMN_MIN_WIDTH: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    Narrow,
    Medium,
    Wide,
}

impl ViewportClass {
    pub const fn from_width(width: u32) -> Self {
        if width < NARROW_MAX_WIDTH {
            Self::Narrow
        } else if width < WIDE_MIN_WIDTH {
            Self::Medium
        } else {
            Self::Wide
        }
    }

    pub const fn details_presentation(self) -> DetailsPresentation {
        match self {
            Self::Narrow => DetailsPresentation::Sheet,
            Self::Medium | Self::Wide => DetailsPresentation::SplitPanel,
        }
    }

    pub const fn arrangement(self, visible_columns: usize) -> BoardArrangement {
        match self {
            Self::Narrow => BoardArrangement::Stacked,
            Self::Medium => BoardArrangement::ScrollSnap {
                min_column_width: SCROLL_COLUMN_MIN_WIDTH,
            },
            Self::Wide => BoardArrangement::Grid {
                tracks: if visible_columns == 0 {
                    1
                } else if visible_columns > ColumnId::COUNT {
                    ColumnId::COUNT
                } else {
                    visible_columns
                },
            },
        }
    }
}

/// How the visible columns are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardArrangement {
    /// One column filling the screen.
    Stacked,
    /// Horizontally scrolling row that snaps to column starts.
    ScrollSnap { min_column_width: u32 },
    Grid { tracks: usize },
}

/// Which details variant to render next to (or over) the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsPresentation {
    /// Compact bottom sheet.
    Sheet,
    /// Full panel beside the board.
    SplitPanel,
}

/// Inputs that decide which columns are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutInputs {
    pub viewport: ViewportClass,
    pub details_open: bool,
    /// Stage picked in the compact stage selector.
    pub selected_stage: ColumnId,
    /// Stage holding the selected application, if any.
    pub selected_column: Option<ColumnId>,
}

/// Filters the board down to the columns that should be rendered. Never
/// reorders or mutates the columns themselves.
pub fn visible_columns<'a>(columns: &'a [Column], inputs: &LayoutInputs) -> Vec<&'a Column> {
    let only = move |id: ColumnId| -> Vec<&'a Column> {
        columns.iter().filter(|column| column.id == id).collect()
    };

    match (inputs.viewport, inputs.details_open, inputs.selected_column) {
        (ViewportClass::Narrow, _, _) => only(inputs.selected_stage),
        (ViewportClass::Wide, true, Some(column)) => only(column),
        _ => columns.iter().collect(),
    }
}

/// Tracks the viewport width and reports class changes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWatcher {
    width: u32,
    class: ViewportClass,
}

impl ViewportWatcher {
    pub const fn new(width: u32) -> Self {
        Self {
            width,
            class: ViewportClass::from_width(width),
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn class(&self) -> ViewportClass {
        self.class
    }

    /// Records a new width, returning the new class when it changed.
    pub fn resize(&mut self, width: u32) -> Option<ViewportClass> {
        self.width = width;
        let class = ViewportClass::from_width(width);
        if class == self.class {
            return None;
        }
        self.class = class;
        Some(class)
    }
}

impl Default for ViewportWatcher {
    fn default() -> Self {
        Self::new(WIDE_MIN_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        ColumnId::ordered().into_iter().map(Column::empty).collect()
    }

    fn ids(visible: &[&Column]) -> Vec<ColumnId> {
        visible.iter().map(|column| column.id).collect()
    }

    #[test]
    fn widths_map_to_classes_at_thresholds() {
        assert_eq!(ViewportClass::from_width(0), ViewportClass::Narrow);
        assert_eq!(ViewportClass::from_width(639), ViewportClass::Narrow);
        assert_eq!(ViewportClass::from_width(640), ViewportClass::Medium);
        assert_eq!(ViewportClass::from_width(1023), ViewportClass::Medium);
        assert_eq!(ViewportClass::from_width(1024), ViewportClass::Wide);
    }

    #[test]
    fn narrow_shows_selected_stage_regardless_of_details() {
        let columns = columns();
        for details_open in [false, true] {
            let inputs = LayoutInputs {
                viewport: ViewportClass::Narrow,
                details_open,
                selected_stage: ColumnId::Interview,
                selected_column: Some(ColumnId::Offer),
            };
            let visible = visible_columns(&columns, &inputs);
            assert_eq!(ids(&visible), vec![ColumnId::Interview]);
        }
    }

    #[test]
    fn wide_with_details_narrows_to_selected_column() {
        let columns = columns();
        let inputs = LayoutInputs {
            viewport: ViewportClass::Wide,
            details_open: true,
            selected_stage: ColumnId::LongList,
            selected_column: Some(ColumnId::Offer),
        };
        assert_eq!(ids(&visible_columns(&columns, &inputs)), vec![ColumnId::Offer]);
    }

    #[test]
    fn medium_and_closed_details_show_everything() {
        let columns = columns();
        let medium = LayoutInputs {
            viewport: ViewportClass::Medium,
            details_open: true,
            selected_stage: ColumnId::LongList,
            selected_column: Some(ColumnId::Offer),
        };
        assert_eq!(visible_columns(&columns, &medium).len(), ColumnId::COUNT);

        let wide_closed = LayoutInputs {
            viewport: ViewportClass::Wide,
            details_open: false,
            ..medium
        };
        assert_eq!(
            ids(&visible_columns(&columns, &wide_closed)),
            ColumnId::ordered().to_vec()
        );

        let wide_without_selection = LayoutInputs {
            viewport: ViewportClass::Wide,
            details_open: true,
            selected_column: None,
            ..medium
        };
        assert_eq!(
            visible_columns(&columns, &wide_without_selection).len(),
            ColumnId::COUNT
        );
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let columns = columns();
        let inputs = LayoutInputs {
            viewport: ViewportClass::Narrow,
            details_open: false,
            selected_stage: ColumnId::Hired,
            selected_column: None,
        };
        assert_eq!(
            visible_columns(&columns, &inputs),
            visible_columns(&columns, &inputs)
        );
    }

    #[test]
    fn watcher_reports_only_class_changes() {
        let mut watcher = ViewportWatcher::new(1280);
        assert_eq!(watcher.resize(1100), None);
        assert_eq!(watcher.resize(800), Some(ViewportClass::Medium));
        assert_eq!(watcher.resize(700), None);
        assert_eq!(watcher.width(), 700);
        assert_eq!(watcher.resize(320), Some(ViewportClass::Narrow));
    }

    #[test]
    fn arrangement_follows_viewport() {
        assert_eq!(ViewportClass::Narrow.arrangement(1), BoardArrangement::Stacked);
        assert_eq!(
            ViewportClass::Medium.arrangement(7),
            BoardArrangement::ScrollSnap {
                min_column_width: 300
            }
        );
        assert_eq!(
            ViewportClass::Wide.arrangement(7),
            BoardArrangement::Grid { tracks: 7 }
        );
        assert_eq!(
            ViewportClass::Wide.arrangement(1),
            BoardArrangement::Grid { tracks: 1 }
        );
        assert_eq!(
            ViewportClass::Narrow.details_presentation(),
            DetailsPresentation::Sheet
        );
    }
}
