//! # CLI Layer
//!
//! This module is the **only** place that knows about stdout, stderr and exit codes.
//!
//! It parses arguments, turns them into [`TodozApi`] calls and renders the
//! returned [`CmdResult`](todoz::api::CmdResult). It holds no business logic.
//!
//! One-shot commands and shell lines share [`dispatch`], so `todoz done 2`
//! and `done 2` typed in the shell take the same path.

use super::print::{
    print_categories, print_detailed_stats, print_full_tasks, print_messages, print_settings,
    print_stats, print_storage, print_tasks,
};
use super::setup::{
    print_grouped_help, print_help_for_command, Cli, Commands, CoreCommands, DataCommands,
    EditArgs, FilterArgs, HistoryCommands, MiscCommands, StatusCommands,
};
use super::shell;
use clap::Parser;
use directories::ProjectDirs;
use std::io::Read;
use std::path::{Path, PathBuf};
use todoz::api::{CmdResult, SettingsAction, TodozApi};
use todoz::editor::{edit_content, EditorContent};
use todoz::error::{Result, TodozError, ValidationErrors};
use todoz::filter::{CategoryFilter, DueFilter, FilterPatch};
use todoz::model::{parse_due_date, Priority, TaskDraft, TaskPatch};
use todoz::sort::{SortField, SortOrder};
use todoz::store::fs::FileStore;
use tracing::debug;

const HOME_ENV: &str = "TODOZ_HOME";

pub(super) struct AppContext {
    pub(super) api: TodozApi<FileStore>,
    pub(super) in_shell: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if !console::Term::stdout().is_term() {
        colored::control::set_override(false);
    }

    if cli.help {
        match &cli.command {
            Some(Commands::Misc(MiscCommands::Help { command: Some(name) })) => {
                print_help_for_command(name)
            }
            Some(command) => print_help_for_command(command_name(command)),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(command) => dispatch(&mut ctx, command),
        None => handle_list(&mut ctx, FilterArgs::default(), None, None),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.home.clone())?;
    debug!(dir = %data_dir.display(), "using data directory");

    let store = FileStore::new(data_dir);
    let api = TodozApi::new(store);

    Ok(AppContext {
        api,
        in_shell: false,
    })
}

/// `--home`, then `$TODOZ_HOME`, then the platform data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "todoz", "todoz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| TodozError::Api("Could not determine data directory".into()))
}

/// Runs one command against the session.
pub(super) fn dispatch(ctx: &mut AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Core(cmd) => match cmd {
            CoreCommands::Add {
                description,
                priority,
                category,
                due,
                editor,
                title,
            } => handle_add(ctx, title, description, priority, category, due, editor),
            CoreCommands::List {
                filter,
                sort,
                order,
            } => handle_list(ctx, filter, sort, order),
            CoreCommands::View { indexes } => handle_view(ctx, indexes),
            CoreCommands::Edit { indexes, fields } => handle_edit(ctx, indexes, fields),
            CoreCommands::Delete { indexes } => {
                let result = ctx.api.delete_tasks(&indexes)?;
                print_messages(&result.messages);
                Ok(())
            }
            CoreCommands::Duplicate { indexes } => {
                let result = ctx.api.duplicate_tasks(&indexes)?;
                print_messages(&result.messages);
                Ok(())
            }
            CoreCommands::Stats { detailed } => handle_stats(ctx, detailed),
            CoreCommands::Categories => {
                let result = ctx.api.categories()?;
                print_categories(&result.categories);
                print_messages(&result.messages);
                Ok(())
            }
        },
        Commands::Status(cmd) => {
            let result = match cmd {
                StatusCommands::Done { indexes } => ctx.api.toggle_tasks(&indexes)?,
                StatusCommands::Complete { indexes } => ctx.api.set_completed(&indexes, true)?,
                StatusCommands::Reopen { indexes } => ctx.api.set_completed(&indexes, false)?,
                StatusCommands::ClearDone => ctx.api.clear_completed()?,
            };
            print_messages(&result.messages);
            Ok(())
        }
        Commands::History(cmd) => {
            let result = match cmd {
                HistoryCommands::Undo => ctx.api.undo()?,
                HistoryCommands::Redo => ctx.api.redo()?,
            };
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Data(cmd) => match cmd {
            DataCommands::Export { file } => handle_export(ctx, file),
            DataCommands::Import { file } => handle_import(ctx, &file),
            DataCommands::Backup => {
                let result = ctx.api.create_backup()?;
                print_messages(&result.messages);
                Ok(())
            }
            DataCommands::Restore => {
                let result = ctx.api.restore_backup()?;
                print_messages(&result.messages);
                Ok(())
            }
            DataCommands::ResetData { yes } => handle_reset(ctx, yes),
            DataCommands::Storage => {
                let result = ctx.api.storage_info()?;
                if let Some(info) = &result.storage {
                    print_storage(info);
                }
                print_messages(&result.messages);
                Ok(())
            }
        },
        Commands::Misc(cmd) => match cmd {
            MiscCommands::Settings { key, value, reset } => handle_settings(ctx, key, value, reset),
            MiscCommands::Shell => {
                if ctx.in_shell {
                    println!("Already in the shell.");
                    Ok(())
                } else {
                    shell::run(ctx)
                }
            }
            MiscCommands::Help { command } => {
                match command {
                    Some(name) => print_help_for_command(&name),
                    None => print!("{}", super::setup::get_grouped_help(ctx.in_shell)),
                }
                Ok(())
            }
        },
    }
}

/// Subcommand name as registered with clap, for `todoz <cmd> --help`.
fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Core(c) => match c {
            CoreCommands::Add { .. } => "add",
            CoreCommands::List { .. } => "list",
            CoreCommands::View { .. } => "view",
            CoreCommands::Edit { .. } => "edit",
            CoreCommands::Delete { .. } => "delete",
            CoreCommands::Duplicate { .. } => "duplicate",
            CoreCommands::Stats { .. } => "stats",
            CoreCommands::Categories => "categories",
        },
        Commands::Status(c) => match c {
            StatusCommands::Done { .. } => "done",
            StatusCommands::Complete { .. } => "complete",
            StatusCommands::Reopen { .. } => "reopen",
            StatusCommands::ClearDone => "clear-done",
        },
        Commands::History(c) => match c {
            HistoryCommands::Undo => "undo",
            HistoryCommands::Redo => "redo",
        },
        Commands::Data(c) => match c {
            DataCommands::Export { .. } => "export",
            DataCommands::Import { .. } => "import",
            DataCommands::Backup => "backup",
            DataCommands::Restore => "restore",
            DataCommands::ResetData { .. } => "reset-data",
            DataCommands::Storage => "storage",
        },
        Commands::Misc(c) => match c {
            MiscCommands::Settings { .. } => "settings",
            MiscCommands::Shell => "shell",
            MiscCommands::Help { .. } => "help",
        },
    }
}

fn parse_priority(value: &str) -> Result<Priority> {
    value
        .parse()
        .map_err(|e| TodozError::Validation(ValidationErrors(vec![e])))
}

pub(super) fn filter_patch(args: FilterArgs) -> Result<FilterPatch> {
    Ok(FilterPatch {
        status: args.status.map(|s| s.parse()).transpose().map_err(TodozError::Api)?,
        priority: args
            .priority
            .map(|p| p.parse())
            .transpose()
            .map_err(TodozError::Api)?,
        category: args.category.map(CategoryFilter::from),
        search_query: args.search,
        due: if args.overdue {
            Some(DueFilter::Overdue)
        } else if args.due_today {
            Some(DueFilter::DueToday)
        } else {
            args.due.map(|d| d.parse()).transpose().map_err(TodozError::Api)?
        },
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn handle_add(
    ctx: &mut AppContext,
    title: Vec<String>,
    description: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    due: Option<String>,
    editor: bool,
) -> Result<()> {
    let settings = ctx.api.settings().clone();

    let mut title = title.join(" ");
    let mut description = non_empty(description);
    if editor {
        let initial = EditorContent::new(title, description.unwrap_or_default());
        let edited = edit_content(&initial)?;
        title = edited.title.clone();
        description = edited.description_opt();
    }

    let draft = TaskDraft {
        title,
        description,
        priority: match priority {
            Some(p) => parse_priority(&p)?,
            None => settings.default_priority,
        },
        category: non_empty(category).unwrap_or(settings.default_category),
        due_date: due.as_deref().map(parse_due_date).transpose()?,
        is_completed: false,
    };

    let result = ctx.api.add_task(draft)?;
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_list(
    ctx: &mut AppContext,
    filter: FilterArgs,
    sort: Option<String>,
    order: Option<String>,
) -> Result<()> {
    let extra = filter_patch(filter)?;
    let sort_override = if sort.is_some() || order.is_some() {
        let settings = ctx.api.settings();
        let field: SortField = match sort {
            Some(s) => s.parse().map_err(TodozError::Api)?,
            None => settings.sort_by,
        };
        let direction: SortOrder = match order {
            Some(o) => o.parse().map_err(TodozError::Api)?,
            None => settings.sort_order,
        };
        Some((field, direction))
    } else {
        None
    };

    let result = ctx.api.list_tasks(extra, sort_override)?;
    render_listing(ctx, &result);
    Ok(())
}

pub(super) fn render_listing(ctx: &AppContext, result: &CmdResult) {
    print_tasks(
        &result.listed_tasks,
        ctx.api.selected_ids(),
        ctx.api.settings().theme,
    );
    print_messages(&result.messages);
}

fn handle_view(ctx: &mut AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.view_tasks(&indexes)?;
    print_full_tasks(&result.listed_tasks, ctx.api.settings().theme);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, indexes: Vec<String>, fields: EditArgs) -> Result<()> {
    if !fields.is_empty() {
        let patch = TaskPatch {
            title: fields.title,
            description: if fields.clear_description {
                Some(None)
            } else {
                fields.description.map(|d| non_empty(Some(d)))
            },
            priority: fields.priority.as_deref().map(parse_priority).transpose()?,
            category: fields.category,
            due_date: if fields.clear_due {
                Some(None)
            } else {
                fields
                    .due
                    .as_deref()
                    .map(parse_due_date)
                    .transpose()?
                    .map(Some)
            },
            is_completed: None,
        };
        let result = ctx.api.update_tasks(&indexes, &patch)?;
        print_messages(&result.messages);
        return Ok(());
    }

    let viewed = ctx.api.view_tasks(&indexes)?;
    for dt in &viewed.listed_tasks {
        let task = &dt.task;
        let initial = EditorContent::new(
            task.title.clone(),
            task.description.clone().unwrap_or_default(),
        );
        let edited = edit_content(&initial)?;
        if edited == initial {
            continue;
        }

        let patch = TaskPatch {
            title: Some(edited.title.clone()),
            description: Some(edited.description_opt()),
            ..TaskPatch::default()
        };
        let result = ctx.api.update_tasks(&[task.id().to_string()], &patch)?;
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_stats(ctx: &mut AppContext, detailed: bool) -> Result<()> {
    let result = ctx.api.stats(detailed)?;
    if let Some(d) = &result.detailed_stats {
        print_detailed_stats(d);
    } else if let Some(s) = &result.stats {
        print_stats(s);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &mut AppContext, file: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export()?;
    let json = result.exported.unwrap_or_default();
    match file {
        Some(path) => {
            std::fs::write(&path, &json)?;
            print_messages(&result.messages);
            println!("Written to {}", path.display());
        }
        // Keep stdout clean for piping.
        None => println!("{}", json),
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let json = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };
    let result = ctx.api.import_json(&json)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reset(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes every task, the settings and the backup.");
        println!("Re-run with --yes to confirm.");
        return Ok(());
    }
    let result = ctx.api.reset_data()?;
    print_messages(&result.messages);
    if ctx.in_shell {
        println!("`undo` brings the tasks back while this shell is open.");
    }
    Ok(())
}

fn handle_settings(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
    reset: bool,
) -> Result<()> {
    let action = match (reset, key, value) {
        (true, _, _) => SettingsAction::Reset,
        (false, None, _) => SettingsAction::ShowAll,
        (false, Some(k), None) => SettingsAction::ShowKey(k),
        (false, Some(k), Some(v)) => SettingsAction::Set(k, v),
    };
    let show_all = action == SettingsAction::ShowAll;

    let result = ctx.api.settings_action(action)?;
    if show_all {
        if let Some(settings) = &result.settings {
            print_settings(settings);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoz::filter::{PriorityFilter, StatusFilter};

    #[test]
    fn data_dir_flag_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/todoz-flag"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/todoz-flag"));
    }

    #[test]
    fn filter_args_become_a_patch() {
        let patch = filter_patch(FilterArgs {
            status: Some("completed".into()),
            priority: Some("high".into()),
            category: Some("all".into()),
            search: Some("rent".into()),
            ..FilterArgs::default()
        })
        .unwrap();
        assert_eq!(patch.due, None);
        assert_eq!(patch.status, Some(StatusFilter::Completed));
        assert_eq!(patch.priority, Some(PriorityFilter::Only(Priority::High)));
        assert_eq!(patch.category, Some(CategoryFilter::All));
        assert_eq!(patch.search_query.as_deref(), Some("rent"));
    }

    #[test]
    fn due_flags_become_a_due_filter() {
        let overdue = filter_patch(FilterArgs {
            overdue: true,
            ..FilterArgs::default()
        })
        .unwrap();
        assert_eq!(overdue.due, Some(DueFilter::Overdue));

        let today = filter_patch(FilterArgs {
            due_today: true,
            ..FilterArgs::default()
        })
        .unwrap();
        assert_eq!(today.due, Some(DueFilter::DueToday));

        let all = filter_patch(FilterArgs {
            due: Some("all".into()),
            ..FilterArgs::default()
        })
        .unwrap();
        assert_eq!(all.due, Some(DueFilter::All));
    }

    #[test]
    fn bad_filter_value_is_an_error() {
        let err = filter_patch(FilterArgs {
            status: Some("sleeping".into()),
            ..FilterArgs::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("sleeping"));
    }

    #[test]
    fn bad_priority_is_a_validation_error() {
        assert!(matches!(
            parse_priority("urgent"),
            Err(TodozError::Validation(_))
        ));
        assert_eq!(parse_priority("H").unwrap(), Priority::High);
    }
}
