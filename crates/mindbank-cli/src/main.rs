use clap::{CommandFactory, Parser, Subcommand};
use mindbank_core::storage::Config;

mod commands;

#[derive(Parser)]
#[command(name = "mindbank", version, about = "Mindbank confidence journal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log confidence deposits
    Deposit {
        #[command(subcommand)]
        action: commands::deposit::DepositAction,
    },
    /// Reframe negative thoughts
    Reframe {
        #[command(subcommand)]
        action: commands::reframe::ReframeAction,
    },
    /// Daily routines
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Daily and weekly scores
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Which questions count toward the score
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Weekly digest and coach suggestions
    Coach {
        #[command(subcommand)]
        action: commands::coach::CoachAction,
    },
    /// Performance project worksheets
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Erase all journal data and settings
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_default();
    if let Err(e) = mindbank_core::logging::init_logging(&config.logging.level) {
        eprintln!("warning: {e}");
    }

    let result = match cli.command {
        Commands::Deposit { action } => commands::deposit::run(action),
        Commands::Reframe { action } => commands::reframe::run(action),
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Score { action } => commands::score::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Coach { action } => commands::coach::run(action, &config),
        Commands::Project { action } => commands::project::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "mindbank", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
