use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use taskboard::api::HttpBackend;
use taskboard::commands::*;
use taskboard::config::{self, Config};
use taskboard::filter;
use taskboard::logging;
use taskboard::modal::FilterForm;
use taskboard::models::Priority;
use taskboard::store::DataStore;
use taskboard::tui::run_tui;
use taskboard::view::{CalendarCursor, ViewMode};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Terminal client for a task board backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides TASKBOARD_API and the config file)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Default)]
struct TaskArgs {
    /// Project name
    #[arg(short, long)]
    project: Option<String>,
    /// Priority (high, medium, low)
    #[arg(short = 'P', long)]
    priority: Option<Priority>,
    /// Owner
    #[arg(short, long)]
    owner: Option<String>,
    /// Category id, or "none" to detach
    #[arg(short, long)]
    category: Option<String>,
    /// Date in YYYY-MM-DD, empty to clear
    #[arg(short, long)]
    date: Option<String>,
    /// Longer description
    #[arg(short = 'D', long)]
    description: Option<String>,
}

impl TaskArgs {
    fn into_fields(self, title: Option<String>) -> TaskFields {
        TaskFields {
            title,
            project: self.project,
            priority: self.priority,
            owner: self.owner,
            category: self.category,
            date: self.date,
            description: self.description,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks in one of the three views
    List {
        /// list, cards or calendar
        #[arg(short, long, value_enum, default_value_t = ViewMode::List)]
        view: ViewMode,
        /// Month shown by the calendar view, YYYY-MM (defaults to this month)
        #[arg(short, long, value_parser = parse_month)]
        month: Option<CalendarCursor>,
        /// Match title or description
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only tasks in this category id
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date, inclusive
        #[arg(long, default_value = "")]
        from: String,
        /// Latest date, inclusive
        #[arg(long, default_value = "")]
        to: String,
        #[arg(short = 'P', long)]
        priority: Option<Priority>,
        /// Project contains (case-insensitive)
        #[arg(long, default_value = "")]
        project: String,
        /// Owner contains (case-insensitive)
        #[arg(long, default_value = "")]
        owner: String,
        /// Only tasks without a date
        #[arg(long)]
        nodate: bool,
        /// Only tasks dated before today
        #[arg(long)]
        overdue: bool,
    },
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        #[command(flatten)]
        fields: TaskArgs,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskArgs,
    },
    /// Remove a task
    Remove {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,
    /// Add a new category
    Add {
        /// Category name
        name: String,
        /// Color as #rrggbb
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Edit a category
    Edit {
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a category; its tasks are detached
    Remove {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_month(s: &str) -> Result<CalendarCursor, String> {
    let (y, m) = s.split_once('-').ok_or_else(|| format!("expected YYYY-MM, got '{}'", s))?;
    let year = y.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let month = m.trim().parse::<u32>().map_err(|e| e.to_string())?;
    CalendarCursor::new(year, month).ok_or_else(|| format!("invalid month '{}'", s))
}

fn open_store(config: &Config) -> Result<DataStore<HttpBackend>> {
    Ok(DataStore::new(HttpBackend::new(&config.api_url)?))
}

async fn run(command: Commands, config: Config) -> Result<()> {
    let mut store = open_store(&config)?;
    match command {
        Commands::List {
            view,
            month,
            search,
            category,
            from,
            to,
            priority,
            project,
            owner,
            nodate,
            overdue,
        } => {
            let filter = FilterForm { from, to, priority, project, owner, nodate, overdue }.collect()?;
            let cursor = month.unwrap_or_else(|| CalendarCursor::containing(filter::today()));
            let query = ListQuery { view, cursor, search, category, filter };
            cmd_list(&mut store, query).await
        }
        Commands::Add { title, fields } => cmd_add(&mut store, fields.into_fields(Some(title))).await,
        Commands::Edit { id, title, fields } => cmd_edit(&mut store, &id, fields.into_fields(title)).await,
        Commands::Remove { id, force } => cmd_remove(&mut store, &id, force).await,
        Commands::Category { command } => match command {
            CategoryCommands::List => cmd_category_list(&mut store).await,
            CategoryCommands::Add { name, color } => cmd_category_add(&mut store, name, color).await,
            CategoryCommands::Edit { id, name, color } => cmd_category_edit(&mut store, &id, name, color).await,
            CategoryCommands::Remove { id, force } => cmd_category_remove(&mut store, &id, force).await,
        },
        Commands::Completions { .. } | Commands::Ui => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "taskboard", &mut io::stdout());
        return;
    }

    let config = match config::load(cli.api) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Ui) | None => match logging::init_file(&config) {
            Ok(_) => run_tui(config).await,
            Err(e) => Err(e),
        },
        Some(command) => {
            logging::init_stderr();
            run(command, config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
