use crate::infra::board_session;
use chrono::{Local, NaiveDate};
use clap::Args;
use pipeline_board::board::{
    ApplicationId, ApplicationPatch, BoardSession, BoardView, ColumnId, DragKey, DropOutcome,
    DropTarget, NewApplication,
};
use pipeline_board::config::{BoardConfig, BoardSeed};
use pipeline_board::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Reference date for new due dates (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Viewport width used for the first rendering pass.
    #[arg(long, default_value_t = 1280)]
    pub(crate) width: u32,
    /// Viewport width used for the compact rendering pass.
    #[arg(long, default_value_t = 390)]
    pub(crate) compact_width: u32,
    /// Print the final board as JSON instead of the text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        width,
        compact_width,
        json,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let config = BoardConfig {
        seed: BoardSeed::Sample,
        ..BoardConfig::default()
    };
    let mut session = board_session(&config, Some(today))?;
    session.resize(width);

    println!("Pipeline board demo ({today})");
    render_board(&session.view());

    println!("\nGestures");
    for (label, outcome) in scripted_gestures(&mut session) {
        println!("  - {label}: {}", describe_outcome(&outcome));
    }

    let created = session.add_application(
        ColumnId::Offer,
        NewApplication::titled("Grace Hopper - Staff Engineer"),
    );
    println!(
        "  - added {} to {} (due {})",
        created.id,
        ColumnId::Offer.title(),
        created.due_date
    );

    session.click(&created.id)?;
    session.apply_edit(&created.id, &ApplicationPatch::status("Offer drafted"))?;

    session.resize(compact_width);
    session.select_stage(ColumnId::Offer);

    let view = session.view();
    if json {
        match serde_json::to_string_pretty(&view) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Board payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("\nCompact view ({compact_width}px)");
    render_board(&view);
    Ok(())
}

/// Pointer and keyboard gestures applied to the sample board, in order.
fn scripted_gestures(session: &mut BoardSession) -> Vec<(&'static str, DropOutcome)> {
    let mut results = Vec::new();

    session.drag_start(ApplicationId::from("1"));
    session.drag_over(Some(DropTarget::from_raw("3")));
    results.push((
        "pointer drag of card 1 onto an interview card",
        session.drag_end(Some(DropTarget::from_raw("3"))),
    ));

    session.drag_start(ApplicationId::from("5"));
    results.push(("drag of card 5 released outside the board", session.drag_end(None)));

    let lifted = ApplicationId::from("9");
    let keys = [DragKey::Activate, DragKey::Up, DragKey::Activate];
    let mut keyboard_outcome = DropOutcome::Cancelled;
    for (index, key) in keys.into_iter().enumerate() {
        let focused = (index == 0).then_some(&lifted);
        if let Some(outcome) = session.press_key(key, focused) {
            keyboard_outcome = outcome;
        }
    }
    results.push(("keyboard lift of card 9 one slot up", keyboard_outcome));

    results
}

fn describe_outcome(outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::Reordered { column, from, to } => {
            format!("reordered {} from slot {} to slot {}", column.title(), from + 1, to + 1)
        }
        DropOutcome::Moved {
            application,
            source,
            destination,
            index,
        } => format!(
            "moved {application} from {} to {} (slot {})",
            source.title(),
            destination.title(),
            index + 1
        ),
        DropOutcome::Unchanged => "dropped in place".to_string(),
        DropOutcome::Cancelled => "cancelled".to_string(),
        DropOutcome::Ignored { reason } => format!("ignored ({reason:?})"),
    }
}

fn render_board(view: &BoardView) {
    println!("Viewport: {:?} ({}px)", view.viewport, view.width);

    println!("Stages");
    for stage in &view.stages {
        let marker = if stage.id == view.selected_stage { "*" } else { " " };
        println!("  {marker} {:<12} {}", stage.title, stage.count_label());
    }

    for column in &view.columns {
        println!("\n{}", column.title);
        if column.applications.is_empty() {
            println!("  (no {})", column.id.spaced_label());
        }
        for application in &column.applications {
            println!(
                "  [{}] {} - {} (due {}, {})",
                application.id,
                application.title,
                application.status,
                application.due_date,
                application.priority.label()
            );
        }
    }

    if let Some(details) = &view.details {
        println!(
            "\nDetails ({:?}): {} in {}",
            details.presentation, details.application.title, details.stage_title
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_session() -> BoardSession {
        let today = NaiveDate::from_ymd_opt(2024, 10, 15).expect("valid date");
        board_session(&BoardConfig::default(), Some(today)).expect("sample board builds")
    }

    #[test]
    fn scripted_gestures_apply_in_order() {
        let mut session = demo_session();

        let results = scripted_gestures(&mut session);

        let outcomes: Vec<&DropOutcome> = results.iter().map(|(_, outcome)| outcome).collect();
        assert!(matches!(
            outcomes[0],
            DropOutcome::Moved {
                destination: ColumnId::Interview,
                ..
            }
        ));
        assert_eq!(outcomes[1], &DropOutcome::Cancelled);
        assert_eq!(
            outcomes[2],
            &DropOutcome::Reordered {
                column: ColumnId::ShortList,
                from: 1,
                to: 0,
            }
        );
        session.store().verify().expect("board stays consistent");
    }

    #[test]
    fn outcomes_are_described_with_one_based_slots() {
        let outcome = DropOutcome::Reordered {
            column: ColumnId::ShortList,
            from: 1,
            to: 0,
        };
        assert_eq!(
            describe_outcome(&outcome),
            "reordered Short List from slot 2 to slot 1"
        );
    }
}
