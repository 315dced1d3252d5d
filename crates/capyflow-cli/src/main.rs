use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use capyflow_core::{Config, Shortcut};
use tracing_subscriber::EnvFilter;

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "capyflow", version, about = "CapyFlow focus timer with a capybara companion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Report window visibility changes
    Tab {
        #[command(subcommand)]
        action: commands::engagement::TabAction,
    },
    /// Fishing line state
    Line {
        #[command(subcommand)]
        action: commands::engagement::LineAction,
    },
    /// Fish collection and catch announcements
    Fish {
        #[command(subcommand)]
        action: commands::rewards::FishAction,
    },
    /// Streak accessories
    Accessory {
        #[command(subcommand)]
        action: commands::rewards::AccessoryAction,
    },
    /// Focus journal
    Journal {
        #[command(subcommand)]
        action: commands::rewards::JournalAction,
    },
    /// Focus history and ecosystem score
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Interact with the capybara
    Capy {
        #[command(subcommand)]
        action: commands::capy::CapyAction,
    },
    /// Background music
    Music {
        #[command(subcommand)]
        action: commands::music::MusicAction,
    },
    /// Scene theme
    Theme {
        #[command(subcommand)]
        action: commands::scene::ThemeAction,
    },
    /// Overlay panels
    Panel {
        #[command(subcommand)]
        action: commands::scene::PanelAction,
    },
    /// Press a keyboard shortcut
    Key {
        /// space, m, c, /, j, h, t or esc
        key: Shortcut,
    },
    /// Flip the sound or focus-fog setting
    Toggle {
        #[arg(value_enum)]
        setting: commands::scene::Setting,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Log to stderr so stdout stays machine readable. `CAPYFLOW_LOG` takes
/// precedence over the configured level.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CAPYFLOW_LOG")
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Tab { action } => commands::engagement::run_tab(action),
        Commands::Line { action } => commands::engagement::run_line(action),
        Commands::Fish { action } => commands::rewards::run_fish(action),
        Commands::Accessory { action } => commands::rewards::run_accessory(action),
        Commands::Journal { action } => commands::rewards::run_journal(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Capy { action } => commands::capy::run(action),
        Commands::Music { action } => commands::music::run(action),
        Commands::Theme { action } => commands::scene::run_theme(action),
        Commands::Panel { action } => commands::scene::run_panel(action),
        Commands::Key { key } => commands::scene::run_key(key),
        Commands::Toggle { setting } => commands::scene::run_toggle(setting),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "capyflow", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
