use clap::Subcommand;
use serde::Serialize;

use crate::session::{print_json, with_session};

#[derive(Subcommand)]
pub enum TabAction {
    /// The window lost visibility
    Hide,
    /// The window is visible again
    Show,
}

#[derive(Subcommand)]
pub enum LineAction {
    /// Repair a broken fishing line
    Repair,
    /// Print away-time and line state as JSON
    Status,
}

#[derive(Serialize)]
struct LineStatus {
    tab_active: bool,
    tracking_away: bool,
    away_secs: u32,
    line_broken: bool,
    current_streak: u32,
}

pub fn run_tab(action: TabAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| {
        let visible = matches!(action, TabAction::Show);
        Ok(session.flow().set_tab_visible(visible))
    })
}

pub fn run_line(action: LineAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| match action {
        LineAction::Repair => Ok(session.flow().repair_line()),
        LineAction::Status => {
            let state = session.state();
            let engagement = state.engagement();
            print_json(&LineStatus {
                tab_active: engagement.is_tab_active(),
                tracking_away: engagement.is_tracking_away(state.session().is_focus_active()),
                away_secs: engagement.away_secs(),
                line_broken: engagement.is_line_broken(),
                current_streak: state.rewards().current_streak(),
            })?;
            Ok(Vec::new())
        }
    })
}
