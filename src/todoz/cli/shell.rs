//! Interactive session.
//!
//! The shell keeps one [`TodozApi`](todoz::api::TodozApi) alive across lines,
//! which is what gives undo/redo, the selection and the filter their meaning.
//! Each line is parsed with [`ShellLine`]; errors are printed and the loop
//! carries on. The task list is shown again after anything that changes it.

use super::commands::{dispatch, filter_patch, handle_list, render_listing, AppContext};
use super::print::{print_messages, print_tasks};
use super::setup::{
    Commands, CoreCommands, DataCommands, MiscCommands, SessionCommands, ShellCommand, ShellLine,
};
use clap::Parser;
use console::Term;
use std::io::{self, IsTerminal};
use todoz::error::{Result, TodozError};
use todoz::filter::FilterPatch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Rerender,
    Exit,
}

pub(super) fn run(ctx: &mut AppContext) -> Result<()> {
    ctx.in_shell = true;
    let term = Term::stdout();
    let interactive = term.is_term() && io::stdin().is_terminal();

    if interactive {
        println!("todoz shell. Type `help` for commands, `quit` to leave.");
    }
    show_list(ctx)?;

    loop {
        let line = if interactive {
            term.write_str(&prompt(ctx))?;
            match term.read_line() {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
        } else {
            let mut buf = String::new();
            if io::stdin().read_line(&mut buf)? == 0 {
                break;
            }
            buf
        };

        match run_line(ctx, &line) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Rerender) => {
                if let Err(e) = show_list(ctx) {
                    eprintln!("Error: {}", e);
                }
            }
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    ctx.in_shell = false;
    Ok(())
}

fn show_list(ctx: &mut AppContext) -> Result<()> {
    println!();
    let result = ctx.api.list_tasks(FilterPatch::default(), None)?;
    render_listing(ctx, &result);
    Ok(())
}

fn prompt(ctx: &AppContext) -> String {
    let mut prompt = String::from("todoz");
    if !ctx.api.filter().is_pass_through() {
        prompt.push_str(" (filtered)");
    }
    let selected = ctx.api.selected_ids().len();
    if selected > 0 {
        prompt.push_str(&format!(" [{} selected]", selected));
    }
    prompt.push_str("> ");
    prompt
}

fn run_line(ctx: &mut AppContext, line: &str) -> Result<Flow> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Flow::Continue);
    }

    let mut words = split_line(trimmed).map_err(TodozError::Api)?;
    if words.first().map(String::as_str) == Some("?") {
        words[0] = "help".to_string();
    }
    debug!(?words, "shell line");

    let parsed = match ShellLine::try_parse_from(&words) {
        Ok(parsed) => parsed,
        Err(e) => {
            e.print()?;
            return Ok(Flow::Continue);
        }
    };

    match parsed.command {
        ShellCommand::App(Commands::Core(CoreCommands::List {
            filter,
            sort,
            order,
        })) => {
            handle_list(ctx, filter, sort, order)?;
            Ok(Flow::Continue)
        }
        ShellCommand::App(command) => {
            let rerender = changes_listing(&command);
            dispatch(ctx, command)?;
            Ok(if rerender { Flow::Rerender } else { Flow::Continue })
        }
        ShellCommand::Session(command) => run_session(ctx, command),
    }
}

fn changes_listing(command: &Commands) -> bool {
    match command {
        Commands::Core(c) => matches!(
            c,
            CoreCommands::Add { .. }
                | CoreCommands::Edit { .. }
                | CoreCommands::Delete { .. }
                | CoreCommands::Duplicate { .. }
        ),
        Commands::Status(_) | Commands::History(_) => true,
        Commands::Data(c) => matches!(
            c,
            DataCommands::Import { .. } | DataCommands::Restore | DataCommands::ResetData { yes: true }
        ),
        Commands::Misc(c) => match c {
            MiscCommands::Settings { value, reset, .. } => value.is_some() || *reset,
            _ => false,
        },
    }
}

fn run_session(ctx: &mut AppContext, command: SessionCommands) -> Result<Flow> {
    let result = match command {
        SessionCommands::Select { indexes } => ctx.api.select(&indexes)?,
        SessionCommands::Unselect { indexes } => ctx.api.unselect(&indexes)?,
        SessionCommands::ToggleSelect { indexes } => ctx.api.toggle_select(&indexes)?,
        SessionCommands::SelectAll => ctx.api.select_all()?,
        SessionCommands::UnselectAll => ctx.api.unselect_all()?,
        SessionCommands::Selected => {
            let result = ctx.api.selected()?;
            print_tasks(
                &result.listed_tasks,
                ctx.api.selected_ids(),
                ctx.api.settings().theme,
            );
            print_messages(&result.messages);
            return Ok(Flow::Continue);
        }
        SessionCommands::Filter { filter } => {
            let patch = filter_patch(filter)?;
            ctx.api.set_filter(patch)?
        }
        SessionCommands::ResetFilter => ctx.api.reset_filter()?,
        SessionCommands::Quit => return Ok(Flow::Exit),
    };
    print_messages(&result.messages);
    Ok(Flow::Rerender)
}

/// Splits a shell line into words. Single and double quotes group words;
/// a backslash escapes the next character outside single quotes.
fn split_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unclosed quote: {}", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
