use clap::Subcommand;
use capyflow_core::history::HEATMAP_DAYS;

use crate::session::{print_json, with_session};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Total, active days, best day and this week's ecosystem score
    Summary,
    /// Per-day focus counts with intensity levels
    Heatmap {
        /// Number of days ending today
        #[arg(long, default_value_t = HEATMAP_DAYS)]
        days: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| {
        match action {
            StatsAction::Summary => print_json(&session.flow().history_summary())?,
            StatsAction::Heatmap { days } => print_json(&session.flow().heatmap(days))?,
        }
        Ok(Vec::new())
    })
}
