use data_organizer::actions::{Action, Executor, MoveParams};
use data_organizer::journal::{Journal, JournalError};
use data_organizer::scanner::{NullSink, ScanConfig, Scanner};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_journal_survives_process_boundary() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("report.txt"), b"quarterly").unwrap();
    fs::write(src.join("old.log"), b"noise").unwrap();
    let targets = Scanner::new(ScanConfig::default())
        .unwrap()
        .scan(&src, &mut NullSink)
        .unwrap()
        .files;

    // Delete one file, keeping its content in the journal
    let executor = Executor::new();
    let delete = executor.execute(&Action::Delete, &targets[..1], false);
    let journal_path = dir.path().join("run.json");
    Journal::new(Some(Action::Delete), delete).save(&journal_path).unwrap();
    assert!(!src.join("old.log").exists());

    // A later run loads the journal and undoes it
    let mut journal = Journal::load(&journal_path).unwrap();
    assert_eq!(journal.rollback_records().len(), 1);
    let outcome = Executor::new().rollback(journal.rollback_records());
    assert!(outcome.all_succeeded());
    assert_eq!(fs::read(src.join("old.log")).unwrap(), b"noise");

    journal.mark_rolled_back(outcome).unwrap();
    journal.save(&journal_path).unwrap();

    let reloaded = Journal::load(&journal_path).unwrap();
    assert!(reloaded.is_rolled_back());
    assert!(matches!(
        reloaded.ensure_rollback_allowed(),
        Err(JournalError::AlreadyRolledBack(_))
    ));
}

#[test]
fn test_move_journal_records_new_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    let targets = Scanner::new(ScanConfig::default())
        .unwrap()
        .scan(dir.path(), &mut NullSink)
        .unwrap()
        .files;
    let dest = dir.path().join("moved");

    let action = Action::Move(MoveParams::new(&dest));
    let result = Executor::new().execute(&action, &targets, false);
    let journal = Journal::new(Some(action), result);
    let json = journal.to_json().unwrap();

    let reloaded = Journal::from_json(&json).unwrap();
    assert_eq!(
        reloaded.rollback_records()[0].new_path.as_deref(),
        Some(dest.join("a.txt").as_path())
    );
}

#[test]
fn test_tampered_journal_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("gone.txt"), b"secret").unwrap();
    let targets = Scanner::new(ScanConfig::default())
        .unwrap()
        .scan(dir.path(), &mut NullSink)
        .unwrap()
        .files;
    let result = Executor::new().execute(&Action::Delete, &targets, false);
    let path = dir.path().join("run.json");
    Journal::new(Some(Action::Delete), result).save(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let tampered = content.replace("gone.txt", "evil.txt");
    fs::write(&path, tampered).unwrap();

    assert!(matches!(
        Journal::load(&path),
        Err(JournalError::ChecksumMismatch)
    ));
}

#[test]
fn test_missing_journal_is_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Journal::load(&dir.path().join("absent.json")),
        Err(JournalError::Io { .. })
    ));
}
