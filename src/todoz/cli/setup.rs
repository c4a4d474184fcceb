use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "todoz",
    bin_name = "todoz",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Command-line to-do list with undo, filters and backups", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $TODOZ_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub home: Option<PathBuf>,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// One line typed into `todoz shell`.
#[derive(Parser, Debug)]
#[command(
    name = "todoz",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    #[command(flatten)]
    App(Commands),

    #[command(flatten)]
    Session(SessionCommands),
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Core,
    Status,
    History,
    Data,
    Session,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Core => "Core Commands:",
            CommandGroup::Status => "Completion Commands:",
            CommandGroup::History => "History Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Session => "Shell-only Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    /// Returns the group for a given command name
    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "list" | "view" | "edit" | "delete" | "duplicate" | "stats" | "categories" => {
                Some(CommandGroup::Core)
            }
            "done" | "complete" | "reopen" | "clear-done" => Some(CommandGroup::Status),
            "undo" | "redo" => Some(CommandGroup::History),
            "export" | "import" | "backup" | "restore" | "reset-data" | "storage" => {
                Some(CommandGroup::Data)
            }
            "select" | "unselect" | "toggle-select" | "select-all" | "unselect-all"
            | "selected" | "filter" | "reset-filter" | "quit" => Some(CommandGroup::Session),
            "settings" | "shell" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    /// Returns all groups in display order
    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Core,
            CommandGroup::Status,
            CommandGroup::History,
            CommandGroup::Data,
            CommandGroup::Session,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help(in_shell: bool) -> String {
    let cmd = ShellLine::command();
    let version = Cli::command().get_version().unwrap_or("unknown").to_string();

    let mut output = String::new();
    output.push_str(&format!("todoz {version}\n"));
    output.push_str("Command-line to-do list with undo, filters and backups\n");
    output.push('\n');
    if in_shell {
        output.push_str("Usage: <COMMAND> [ARGS]\n");
    } else {
        output.push_str("Usage: todoz [OPTIONS] [COMMAND]\n");
    }

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        if *group == CommandGroup::Session && !in_shell {
            continue;
        }
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<13} {}\n", name, about));
            }
        }
    }

    if !in_shell {
        output.push('\n');
        output.push_str("Options:\n");
        output.push_str("      --home <DIR>  Data directory\n");
        output.push_str("  -h, --help        Print help\n");
        output.push_str("  -V, --version     Print version\n");
        output.push('\n');
        output.push_str("Tasks are addressed by index (3), range (2-5), UUID, or `selected`.\n");
    }

    output
}

/// Generates the custom grouped help output
pub fn print_grouped_help() {
    print!("{}", get_grouped_help(false));
}

/// Prints help for a command by name
pub fn print_help_for_command(name: &str) {
    let mut cmd = ShellLine::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name || subcmd.get_all_aliases().any(|a| a == name) {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Status(StatusCommands),

    #[command(flatten)]
    History(HistoryCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Add a task
    #[command(alias = "a", display_order = 1)]
    Add {
        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: low, medium or high (default from settings)
        #[arg(short, long)]
        priority: Option<String>,

        /// Category (default from settings)
        #[arg(short, long)]
        category: Option<String>,

        /// Due date: YYYY-MM-DD, "YYYY-MM-DD HH:MM" or RFC 3339
        #[arg(long)]
        due: Option<String>,

        /// Compose title and description in $EDITOR
        #[arg(short, long)]
        editor: bool,

        /// Title words (joined with spaces)
        #[arg(num_args = 0..)]
        title: Vec<String>,
    },

    /// List tasks
    #[command(alias = "ls", display_order = 2)]
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Sort by: createdAt, dueDate, priority or title
        #[arg(long)]
        sort: Option<String>,

        /// Sort order: asc or desc
        #[arg(long)]
        order: Option<String>,
    },

    /// Show tasks in full
    #[command(alias = "v", display_order = 3)]
    View {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Edit tasks, in $EDITOR unless field flags are given
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete tasks
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Copy tasks as new, not completed tasks
    #[command(alias = "dup", display_order = 6)]
    Duplicate {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Show completion statistics
    #[command(display_order = 7)]
    Stats {
        /// Break down by priority, category and due date
        #[arg(long)]
        detailed: bool,
    },

    /// List categories in use
    #[command(display_order = 8)]
    Categories,
}

#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// Toggle completion of tasks
    #[command(alias = "toggle", display_order = 10)]
    Done {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Mark tasks completed
    #[command(display_order = 11)]
    Complete {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Mark tasks not completed
    #[command(display_order = 12)]
    Reopen {
        /// Tasks (e.g. 1 2-4 selected)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Delete every completed task
    #[command(display_order = 13)]
    ClearDone,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// Undo the last change of this session
    #[command(display_order = 20)]
    Undo,

    /// Redo the last undone change
    #[command(display_order = 21)]
    Redo,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Export tasks and settings as JSON (stdout unless a file is given)
    #[command(display_order = 30)]
    Export {
        /// Output file
        file: Option<PathBuf>,
    },

    /// Import a JSON export, replacing all tasks
    #[command(display_order = 31)]
    Import {
        /// Input file, or - for stdin
        file: PathBuf,
    },

    /// Save a backup inside the data directory
    #[command(display_order = 32)]
    Backup,

    /// Restore the saved backup
    #[command(display_order = 33)]
    Restore,

    /// Delete all tasks, settings and the backup
    #[command(display_order = 34)]
    ResetData {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show storage usage
    #[command(display_order = 35)]
    Storage,
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set settings
    #[command(display_order = 40)]
    Settings {
        /// Settings key (theme, defaultCategory, defaultPriority, sortBy, sortOrder)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,

        /// Restore default settings
        #[arg(long, conflicts_with_all = ["key", "value"])]
        reset: bool,
    },

    /// Start an interactive session (keeps history, selection and filter)
    #[command(display_order = 41)]
    Shell,

    /// Print help for todoz or a subcommand
    #[command(display_order = 42)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Add tasks to the selection
    #[command(display_order = 50)]
    Select {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Remove tasks from the selection
    #[command(display_order = 51)]
    Unselect {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Flip selection of tasks
    #[command(display_order = 52)]
    ToggleSelect {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Select every task passing the filter
    #[command(display_order = 53)]
    SelectAll,

    /// Clear the selection
    #[command(display_order = 54)]
    UnselectAll,

    /// List selected tasks
    #[command(display_order = 55)]
    Selected,

    /// Set the session filter
    #[command(display_order = 56)]
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Clear the session filter
    #[command(display_order = 57)]
    ResetFilter,

    /// Leave the shell
    #[command(alias = "exit", display_order = 58)]
    Quit,
}

#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Status: all, active or completed
    #[arg(long)]
    pub status: Option<String>,

    /// Priority: all, low, medium or high
    #[arg(long)]
    pub priority: Option<String>,

    /// Category, or all
    #[arg(long)]
    pub category: Option<String>,

    /// Text to look for in title, description or category
    #[arg(long)]
    pub search: Option<String>,

    /// Due date: all, overdue or today
    #[arg(long, value_name = "WHEN", conflicts_with_all = ["overdue", "due_today"])]
    pub due: Option<String>,

    /// Only pending tasks past their due date
    #[arg(long, conflicts_with = "due_today")]
    pub overdue: bool,

    /// Only pending tasks due later today
    #[arg(long)]
    pub due_today: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct EditArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,

    /// New priority
    #[arg(short, long)]
    pub priority: Option<String>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// New due date
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

impl EditArgs {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && !self.clear_description
            && self.priority.is_none()
            && self.category.is_none()
            && self.due.is_none()
            && !self.clear_due
    }
}
