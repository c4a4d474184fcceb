use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn todoz(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("TODOZ_HOME")
        .env_remove("TODOZ_LOG")
        .env_remove("RUST_LOG")
        .arg("--home")
        .arg(home);
    cmd
}

fn add(home: &Path, args: &[&str]) {
    todoz(home).arg("add").args(args).assert().success();
}

#[test]
fn add_then_list() {
    let home = tempfile::tempdir().unwrap();

    todoz(home.path())
        .args(["add", "-p", "high", "Buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task added: Buy milk"));

    todoz(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [ ] Buy milk"))
        .stdout(predicate::str::contains("high"))
        .stdout(predicate::str::contains("work"));
}

#[test]
fn no_command_lists() {
    let home = tempfile::tempdir().unwrap();
    todoz(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks yet"));
}

#[test]
fn empty_title_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    todoz(home.path())
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title cannot be empty"));
}

#[test]
fn done_and_status_filter() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["First"]);
    add(home.path(), &["Second"]);

    // Newest first: Second is 1, First is 2.
    todoz(home.path())
        .args(["done", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Toggled 1 task"));

    todoz(home.path())
        .args(["list", "--status", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2. [x] First"))
        .stdout(predicate::str::contains("Second").not());
}

#[test]
fn unknown_index_fails() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["Only"]);
    todoz(home.path())
        .args(["delete", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index 5 not found"));
}

#[test]
fn huge_range_fails_fast() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["Only"]);
    todoz(home.path())
        .args(["done", "1-18446744073709551615"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index 18446744073709551615 not found"));
}

#[test]
fn duplicate_adds_an_open_copy() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["-c", "home", "Water", "plants"]);
    todoz(home.path()).args(["complete", "1"]).assert().success();

    todoz(home.path())
        .args(["dup", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Duplicated 1 task"));

    todoz(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [ ] Water plants (copy)"))
        .stdout(predicate::str::contains("2. [x] Water plants"));
}

#[test]
fn list_overdue_and_due_today() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["--due", "2001-02-03", "Ancient"]);
    add(home.path(), &["--due", "2999-01-01", "Distant"]);
    add(home.path(), &["Undated"]);

    todoz(home.path())
        .args(["list", "--overdue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3. [ ] Ancient"))
        .stdout(predicate::str::contains("Distant").not())
        .stdout(predicate::str::contains("Undated").not());

    todoz(home.path())
        .args(["list", "--due-today"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks match the current filter"));
}

#[test]
fn search_matches_category() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["-c", "garden", "Mow"]);
    add(home.path(), &["-c", "office", "Print"]);

    todoz(home.path())
        .args(["list", "--search", "GARD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mow"))
        .stdout(predicate::str::contains("Print").not());
}

#[test]
fn stats_reports_rate() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["A"]);
    add(home.path(), &["B"]);
    add(home.path(), &["C"]);
    todoz(home.path()).args(["complete", "1"]).assert().success();

    todoz(home.path())
        .args(["stats", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:      3"))
        .stdout(predicate::str::contains("Done:       33%"))
        .stdout(predicate::str::contains("By priority"));
}

#[test]
fn edit_with_flags() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["Draft"]);
    todoz(home.path())
        .args(["edit", "1", "--title", "Final", "-c", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 1 task"));

    todoz(home.path())
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final"))
        .stdout(predicate::str::contains("Category:  home"));
}

#[test]
fn settings_defaults_apply_to_new_tasks() {
    let home = tempfile::tempdir().unwrap();
    todoz(home.path())
        .args(["settings", "defaultCategory", "errands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaultCategory set to errands"));

    add(home.path(), &["Post office"]);
    todoz(home.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("errands"));

    todoz(home.path())
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("sortOrder = desc"));
}

#[test]
fn export_import_round_trip_between_homes() {
    let source = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    add(source.path(), &["Portable"]);

    let file = source.path().join("export.json");
    todoz(source.path())
        .arg("export")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 task"));

    todoz(target.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 task"));

    todoz(target.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Portable"));
}

#[test]
fn import_rejects_documents_without_version() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["Keep me"]);
    let file = home.path().join("bad.json");
    std::fs::write(&file, r#"{"todos": []}"#).unwrap();

    todoz(home.path())
        .arg("import")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import failed"));

    todoz(home.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Keep me"));
}

#[test]
fn reset_data_needs_confirmation() {
    let home = tempfile::tempdir().unwrap();
    add(home.path(), &["Precious"]);

    todoz(home.path())
        .arg("reset-data")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    todoz(home.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Precious"));

    todoz(home.path())
        .args(["reset-data", "--yes"])
        .assert()
        .success();
    todoz(home.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("No tasks yet"));
}

#[test]
fn shell_keeps_history_and_selection() {
    let home = tempfile::tempdir().unwrap();

    let script = "\
add \"Pay rent\" -p high
add Call mom
select 1 2
complete selected
stats
undo
stats
quit
";
    todoz(home.path())
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task added: Pay rent"))
        .stdout(predicate::str::contains("Selected 2 tasks"))
        .stdout(predicate::str::contains("Completed 2 tasks"))
        .stdout(predicate::str::contains("Done:       100%"))
        .stdout(predicate::str::contains("Undone"))
        .stdout(predicate::str::contains("Done:       0%"));
}

#[test]
fn shell_reports_errors_and_keeps_going() {
    let home = tempfile::tempdir().unwrap();
    todoz(home.path())
        .arg("shell")
        .write_stdin("done 7\nfrobnicate\nadd Survivor\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Index 7 not found"))
        .stdout(predicate::str::contains("Task added: Survivor"));
}

#[test]
fn shell_filter_scopes_select_all() {
    let home = tempfile::tempdir().unwrap();
    let script = "\
add Low one -p low
add High one -p high
filter --priority high
select-all
delete selected
reset-filter
list
";
    todoz(home.path())
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("priority=high"))
        .stdout(predicate::str::contains("Selected 1 task"))
        .stdout(predicate::str::contains("Deleted 1 task"));

    todoz(home.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Low one"))
        .stdout(predicate::str::contains("High one").not());
}

#[test]
fn grouped_help() {
    let home = tempfile::tempdir().unwrap();
    todoz(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Core Commands:"))
        .stdout(predicate::str::contains("clear-done"));
}
