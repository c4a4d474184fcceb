use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use console::Term;
use timeago::Formatter;
use todoz::api::{CmdMessage, MessageLevel};
use todoz::index::DisplayTask;
use todoz::model::{Priority, Task};
use todoz::persistence::StorageInfo;
use todoz::settings::{Settings, Theme, KEYS};
use todoz::stats::{due_state, DetailedStats, DueState, TaskStats};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use uuid::Uuid;

const LINE_WIDTH: usize = 100;
const MIN_LINE_WIDTH: usize = 60;
const TIME_WIDTH: usize = 14;
const DUE_WIDTH: usize = 12;
const PRIORITY_WIDTH: usize = 8;
const CATEGORY_WIDTH: usize = 14;
const SELECTED_MARKER: &str = "•";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn line_width() -> usize {
    let term = Term::stdout();
    if !term.is_term() {
        return LINE_WIDTH;
    }
    term.size_checked()
        .map(|(_, cols)| (cols as usize).max(MIN_LINE_WIDTH))
        .unwrap_or(LINE_WIDTH)
}

fn accent(s: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => s.blue(),
        Theme::Dark => s.bright_cyan(),
    }
}

fn priority_colored(priority: Priority) -> ColoredString {
    let label = format!("{:<width$}", priority.as_str(), width = PRIORITY_WIDTH);
    match priority {
        Priority::High => label.red(),
        Priority::Medium => label.yellow(),
        Priority::Low => label.dimmed(),
    }
}

fn due_colored(task: &Task, now: DateTime<Utc>) -> ColoredString {
    let Some(due) = task.due_date else {
        return " ".repeat(DUE_WIDTH).normal();
    };
    let label = format!(
        "{:<width$}",
        due.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        width = DUE_WIDTH
    );
    if task.is_completed {
        return label.dimmed();
    }
    match due_state(task, &now.with_timezone(&Local)) {
        Some(DueState::Overdue) => label.red(),
        Some(DueState::DueToday) => label.yellow(),
        None => label.normal(),
    }
}

/// One line per task: selection marker, index, checkbox, title, then the
/// fixed-width category, priority, due date and age columns.
pub(super) fn print_tasks(tasks: &[DisplayTask], selected: &[Uuid], theme: Theme) {
    if tasks.is_empty() {
        return;
    }

    let width = line_width();
    let now = Utc::now();
    let idx_width = tasks
        .iter()
        .map(|dt| format!("{}. ", dt.index).width())
        .max()
        .unwrap_or(3);

    for dt in tasks {
        let task = &dt.task;

        let left_prefix = if selected.contains(&task.id()) {
            format!("  {} ", SELECTED_MARKER)
        } else {
            "    ".to_string()
        };
        let idx_str = format!("{:<width$}", format!("{}. ", dt.index), width = idx_width);
        let checkbox = if task.is_completed { "[x] " } else { "[ ] " };

        let fixed_width = left_prefix.width()
            + idx_width
            + checkbox.width()
            + CATEGORY_WIDTH
            + PRIORITY_WIDTH
            + DUE_WIDTH
            + TIME_WIDTH;
        let available = width.saturating_sub(fixed_width);

        let title_display = truncate_to_width(&task.title, available.saturating_sub(1));
        let padding = available.saturating_sub(title_display.width());
        let title_colored = if task.is_completed {
            title_display.dimmed().strikethrough()
        } else {
            title_display.normal()
        };

        let category = truncate_to_width(&task.category, CATEGORY_WIDTH.saturating_sub(1));
        let category = format!("{:<width$}", category, width = CATEGORY_WIDTH - 1);

        println!(
            "{}{}{}{}{} {}{}{}{}",
            left_prefix,
            accent(&idx_str, theme),
            checkbox,
            title_colored,
            " ".repeat(padding),
            category.dimmed(),
            priority_colored(task.priority),
            due_colored(task, now),
            format_time_ago(task.created_at()).dimmed()
        );
    }
}

pub(super) fn print_full_tasks(tasks: &[DisplayTask], theme: Theme) {
    let now = Utc::now();
    for (i, dt) in tasks.iter().enumerate() {
        let task = &dt.task;
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            accent(&dt.index.to_string(), theme),
            task.title.bold()
        );
        println!("--------------------------------");

        let status = if task.is_completed {
            "completed".green()
        } else if task.is_overdue_at(now) {
            "overdue".red()
        } else {
            "active".normal()
        };
        println!("Status:    {}", status);
        println!("Priority:  {}", priority_colored(task.priority));
        println!("Category:  {}", task.category);
        if let Some(due) = task.due_date {
            println!(
                "Due:       {}",
                due.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            );
        }
        println!(
            "Created:   {} ({})",
            task.created_at().with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            format_time_ago(task.created_at()).trim()
        );
        println!("{}", format!("Id:        {}", task.id()).dimmed());

        if let Some(description) = &task.description {
            println!();
            println!("{}", description);
        }
    }
}

pub(super) fn print_stats(stats: &TaskStats) {
    println!("Total:      {}", stats.total);
    println!("Active:     {}", stats.active);
    println!("Completed:  {}", stats.completed.to_string().green());
    println!("Done:       {}%", stats.completion_rate);
}

pub(super) fn print_detailed_stats(detailed: &DetailedStats) {
    print_stats(&detailed.summary);

    println!();
    println!("{}", "By priority".bold());
    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        println!(
            "  {}{}",
            priority_colored(priority),
            detailed.by_priority.get(priority)
        );
    }

    if !detailed.by_category.is_empty() {
        println!();
        println!("{}", "By category".bold());
        let name_width = detailed
            .by_category
            .keys()
            .map(|c| c.width())
            .max()
            .unwrap_or(0)
            + 2;
        for (category, count) in &detailed.by_category {
            println!("  {:<width$}{}", category, count, width = name_width);
        }
    }

    println!();
    let overdue = format!("Overdue:    {}", detailed.overdue);
    if detailed.overdue > 0 {
        println!("{}", overdue.red());
    } else {
        println!("{}", overdue);
    }
    println!("Due today:  {}", detailed.due_today);
}

pub(super) fn print_categories(categories: &[String]) {
    for category in categories {
        println!("{}", category);
    }
}

pub(super) fn print_settings(settings: &Settings) {
    for key in KEYS {
        let value = settings.get(key).unwrap_or_default();
        println!("{} = {}", key, value);
    }
}

pub(super) fn print_storage(info: &StorageInfo) {
    let line = format!(
        "Storage: {} of {} bytes used ({}%)",
        info.used, info.total, info.percentage
    );
    if info.percentage >= 90 {
        println!("{}", line.yellow());
    } else {
        println!("{}", line);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    // Pad singular units so the column lines up with plurals.
    let time_str = time_str
        .replace("hour ago", "hour  ago")
        .replace("minute ago", "minute  ago")
        .replace("second ago", "second  ago")
        .replace("day ago", "day  ago")
        .replace("week ago", "week  ago")
        .replace("month ago", "month  ago")
        .replace("year ago", "year  ago");

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Buy milk", 20), "Buy milk");
    }

    #[test]
    fn truncate_marks_cut_text() {
        let cut = truncate_to_width("Write the quarterly report", 10);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 10);
    }

    #[test]
    fn truncate_counts_wide_chars() {
        let cut = truncate_to_width("日本語のタスク", 6);
        assert!(cut.width() <= 6);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn truncate_flattens_newlines() {
        assert_eq!(truncate_to_width("a\nb", 10), "a b");
    }

    #[test]
    fn time_ago_is_fixed_width() {
        let s = format_time_ago(Utc::now());
        assert_eq!(s.width(), TIME_WIDTH);
    }
}
