use clap::Subcommand;
use serde::Serialize;

use capyflow_core::CapyMood;

use crate::session::{print_json, with_session};

#[derive(Subcommand)]
pub enum CapyAction {
    /// Pet the capybara
    Pet,
    /// Cast the fishing line
    Cast,
    /// Say something to the capybara
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print mood and the last chat exchange as JSON
    Status,
}

#[derive(Serialize)]
struct CapyStatus<'a> {
    mood: CapyMood,
    casting: bool,
    last_message: &'a str,
    last_response: Option<&'a str>,
}

pub fn run(action: CapyAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| match action {
        CapyAction::Pet => Ok(session.flow().pet()),
        CapyAction::Cast => Ok(session.flow().cast()),
        CapyAction::Chat { message } => {
            let message = message.join(" ");
            Ok(vec![session.flow().chat(&message)])
        }
        CapyAction::Status => {
            let state = session.state();
            print_json(&CapyStatus {
                mood: state.capy().mood(),
                casting: state.capy().is_casting(),
                last_message: state.chat().last_message(),
                last_response: state.chat().last_response(),
            })?;
            Ok(Vec::new())
        }
    })
}
