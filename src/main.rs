use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

use tally::{ops, Outcome, Store, StoreError};

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about = "Index-card productivity tracking: tasks, energy, sprint health")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print the full result envelope as JSON instead of the message
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task
    Add {
        /// Task content
        content: String,

        /// Priority: deep, standard, light, someday
        #[arg(short, long, default_value = "standard")]
        priority: String,

        /// Optional initial note
        #[arg(long)]
        note: Option<String>,
    },

    /// Complete a task (by id or content match)
    Done {
        /// Task id or content fragment
        task: String,
    },

    /// Roll a task forward into the next day
    Roll {
        /// Task id or content fragment
        task: String,
    },

    /// List active tasks by category
    Tasks {
        /// Only this priority: deep, standard, light, someday
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Show tasks with avoidance patterns (rolled 3+ times)
    Avoided,

    /// Log an energy reading
    Energy {
        /// Level: high, medium, low, depleted, recovery
        level: String,

        /// What's going on right now
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Show current sprint status
    Status,

    /// Full pattern analysis
    Patterns,

    /// Overall data summary
    Summary,

    /// Log a field report (quick capture)
    Report {
        /// Report text
        text: String,
    },

    /// Record a rest day and reset the sprint counter
    Rest,

    /// Manage productivity sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Start a session: briefing, card, energy, accountability, general
    Start {
        /// Session type
        session_type: String,
    },
    /// End the current session
    End,
    /// Show the current session
    Show,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set the sprint warning/danger thresholds
    SetSprint {
        /// Day count before the sprint reads as a warning
        #[arg(long)]
        warning: u32,

        /// Day count before the sprint reads as danger
        #[arg(long)]
        danger: u32,
    },
    /// Reset configuration to defaults
    Reset,
}

fn main() {
    let cli = Cli::parse();

    if let Command::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "tally", &mut std::io::stdout());
        return;
    }

    let outcome = match run(&cli.command) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {}", "Storage failure:".red().bold(), e);
            std::process::exit(2);
        }
    };

    render(&outcome, cli.json);
    if !outcome.success {
        std::process::exit(1);
    }
}

fn run(command: &Command) -> Result<Outcome, StoreError> {
    let store = Store::open()?;
    let mut config = store.load_config()?;

    match command {
        Command::Add {
            content,
            priority,
            note,
        } => ops::add_task(&store, &config, content, priority, note.as_deref()),
        Command::Done { task } => ops::complete_task(&store, &config, task),
        Command::Roll { task } => ops::roll_task(&store, &config, task),
        Command::Tasks { priority } => ops::list_tasks(&store, &config, priority.as_deref()),
        Command::Avoided => ops::avoided_tasks(&store, &config),
        Command::Energy { level, context } => {
            ops::log_energy(&store, &config, level, context.as_deref())
        }
        Command::Status => ops::sprint_status(&store, &config),
        Command::Patterns => ops::pattern_analysis(&store, &config),
        Command::Summary => ops::summary(&store, &config),
        Command::Report { text } => ops::add_field_report(&store, &config, text),
        Command::Rest => ops::record_rest_day(&store, &config),
        Command::Session { action } => match action {
            SessionAction::Start { session_type } => {
                ops::start_session(&store, session_type, None)
            }
            SessionAction::End => ops::end_session(&store),
            SessionAction::Show => match tally::Sessions::new(&store).current()? {
                Some(session) => Ok(Outcome::ok_with(
                    format!(
                        "Current session: {} (started {})",
                        session.session_type,
                        session.started_at.format("%Y-%m-%d %H:%M")
                    ),
                    serde_json::to_value(&session)?,
                )),
                None => Ok(Outcome::ok("No active session.")),
            },
        },
        Command::Config { action } => match action {
            ConfigAction::Show => ops::show_config(&config),
            ConfigAction::SetSprint { warning, danger } => {
                ops::set_sprint_thresholds(&store, &mut config, *warning, *danger)
            }
            ConfigAction::Reset => ops::reset_config(&store, &mut config),
        },
        Command::Completion { .. } => unreachable!("handled before opening the store"),
    }
}

fn render(outcome: &Outcome, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode outcome: {}", e),
        }
        return;
    }

    if outcome.success {
        println!("{}", outcome.message);
    } else {
        eprintln!("{} {}", "Error:".red().bold(), outcome.message);
    }
}
