mod app;
mod config;
mod effects;
mod render;
mod shell;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docshelf_core::Msg;
use docshelf_logging::{LevelFilter, LogDestination, DEFAULT_LOG_FILE};

use app::Session;
use config::Settings;

/// Browse a course's shared documents from the terminal.
#[derive(Parser, Debug)]
#[command(name = "docshelf", version)]
struct Cli {
    /// Config file (defaults to ./docshelf.ron when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the stored catalog.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    /// Course whose roster to use.
    #[arg(long, global = true)]
    course: Option<String>,
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default).
    Shell,
    /// Print the stored catalog.
    List,
    /// Replace the catalog with the course roster.
    Fetch,
    /// Add a document by its sharing URL.
    Add {
        url: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Remove a document by id.
    Remove { id: String },
    /// Ask the backend to process a document.
    Process {
        #[arg(long)]
        id: Option<String>,
    },
    /// Check Discord uploads for a document.
    CheckUploads {
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the "make a copy" URL of a document.
    CopyUrl {
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the editor URL of a document.
    OpenUrl {
        #[arg(long)]
        id: Option<String>,
    },
}

/// How long one-shot commands wait for the backend.
const ONE_SHOT_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_env(|key| std::env::var(key).ok());
    if let Some(state_dir) = cli.state_dir.clone() {
        settings.state_dir = state_dir;
    }
    if let Some(course) = cli.course.clone() {
        settings.course_id = course;
    }

    init_logging(&settings, cli.verbose);

    let session = Session::start(&settings).context("could not start session")?;
    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => app::run_shell(session),
        Command::List => run_once(session, None, Vec::new()),
        Command::Fetch => run_once(session, None, vec![Msg::FetchClicked]),
        Command::Add { url, name } => run_once(
            session,
            None,
            vec![
                Msg::ManualNameChanged(name.join(" ")),
                Msg::ManualUrlChanged(url),
                Msg::AddManualSubmitted {
                    created_at_ms: app::now_ms(),
                },
            ],
        ),
        Command::Remove { id } => run_once(session, None, vec![Msg::RemoveClicked(id)]),
        Command::Process { id } => run_once(session, id, vec![Msg::ProcessClicked]),
        Command::CheckUploads { id } => run_once(session, id, vec![Msg::CheckUploadsClicked]),
        Command::CopyUrl { id } => run_once(session, id, vec![Msg::CopyClicked]),
        Command::OpenUrl { id } => run_once(session, id, vec![Msg::OpenClicked]),
    }
}

fn init_logging(settings: &Settings, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let destination = if settings.log_to_file {
        LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
    } else {
        LogDestination::Terminal
    };
    docshelf_logging::initialize(destination, level);
}

fn run_once(mut session: Session, target: Option<String>, msgs: Vec<Msg>) -> anyhow::Result<()> {
    let mut notices = Vec::new();
    if let Some(id) = target {
        notices.extend(session.select(&id)?);
    }
    for msg in msgs {
        notices.extend(session.dispatch(msg));
    }
    notices.extend(session.settle(ONE_SHOT_TIMEOUT));

    for notice in &notices {
        println!("{}", render::format_notice(notice));
    }
    let view = session.view();
    print!("{}", render::render(&view));
    app::one_shot_outcome(&view)
}
