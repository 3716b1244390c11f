use clap::Parser;
use data_organizer::cli::Cli;
use data_organizer::error::ExitCode;
use data_organizer::journal::Journal;
use data_organizer::run_app;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Run the app with an isolated (absent) config file.
fn run(config_dir: &Path, args: &[&str]) -> anyhow::Result<ExitCode> {
    let config = config_dir.join("no-config.toml");
    let mut argv = vec![
        "data-organizer".to_string(),
        "-q".to_string(),
        "--no-color".to_string(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
    ];
    argv.extend(args.iter().map(|s| (*s).to_string()));
    run_app(Cli::try_parse_from(argv).unwrap())
}

#[test]
fn test_cli_scan_and_duplicates_succeed() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), b"same").unwrap();
    fs::write(data.join("b.txt"), b"same").unwrap();
    let root = data.to_str().unwrap();

    for output in ["text", "json", "csv"] {
        let code = run(dir.path(), &["scan", root, "--output", output]).unwrap();
        assert_eq!(code, ExitCode::Success);
        let code = run(dir.path(), &["duplicates", root, "--output", output]).unwrap();
        assert_eq!(code, ExitCode::Success);
    }
}

#[test]
fn test_cli_scan_missing_root_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    assert!(run(dir.path(), &["scan", missing.to_str().unwrap()]).is_err());
}

#[test]
fn test_cli_tree_rejects_csv() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    assert_eq!(run(dir.path(), &["tree", root]).unwrap(), ExitCode::Success);
    assert!(run(dir.path(), &["tree", root, "--output", "csv"]).is_err());
}

#[test]
fn test_cli_execute_defaults_to_dry_run() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("victim.txt");
    fs::write(&file, b"still here").unwrap();
    let journal = dir.path().join("run.json");

    let code = run(
        dir.path(),
        &[
            "execute",
            "--action",
            "delete",
            "--journal",
            journal.to_str().unwrap(),
            file.to_str().unwrap(),
        ],
    )
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(file.exists());
    assert!(!journal.exists());
}

#[test]
fn test_cli_execute_apply_then_rollback() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("report.txt");
    fs::write(&file, b"numbers").unwrap();
    let dest = dir.path().join("archive");
    let journal = dir.path().join("run.json");

    let code = run(
        dir.path(),
        &[
            "execute",
            "--action",
            "move",
            "--dest",
            dest.to_str().unwrap(),
            "--apply",
            "--journal",
            journal.to_str().unwrap(),
            file.to_str().unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(!file.exists());
    assert!(dest.join("report.txt").exists());

    let code = run(dir.path(), &["rollback", journal.to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read(&file).unwrap(), b"numbers");
    assert!(Journal::load(&journal).unwrap().is_rolled_back());

    // A second rollback is refused
    assert!(run(dir.path(), &["rollback", journal.to_str().unwrap()]).is_err());
}

#[test]
fn test_cli_execute_partial_failure_exit_code() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present.txt");
    fs::write(&present, b"x").unwrap();
    let absent = dir.path().join("absent.txt");

    let code = run(
        dir.path(),
        &[
            "execute",
            "--action",
            "delete",
            "--apply",
            present.to_str().unwrap(),
            absent.to_str().unwrap(),
        ],
    )
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(!present.exists());
}

#[test]
fn test_cli_execute_unknown_action() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, b"a").unwrap();

    let code = run(
        dir.path(),
        &["execute", "--action", "shred", "--apply", file.to_str().unwrap()],
    )
    .unwrap();

    assert_eq!(code, ExitCode::GeneralError);
    assert!(file.exists());
}

#[test]
fn test_cli_execute_unwritable_journal_changes_nothing() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("keep.txt");
    fs::write(&file, b"precious").unwrap();
    let journal = dir.path().join("no_such_dir").join("j.json");

    let result = run(
        dir.path(),
        &[
            "execute",
            "--action",
            "delete",
            "--apply",
            "--journal",
            journal.to_str().unwrap(),
            file.to_str().unwrap(),
        ],
    );

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Cannot write journal"));
    assert_eq!(fs::read(&file).unwrap(), b"precious");
    assert!(!journal.exists());
}
