use data_organizer::actions::{
    Action, ActionKind, ActionRequest, CompressParams, Executor, MoveParams, OperationStatus,
    TagParams,
};
use data_organizer::error::ErrorKind;
use data_organizer::scanner::{NullSink, ScanConfig, Scanner};
use std::fs;
use tempfile::tempdir;

fn scanned(root: &std::path::Path) -> Vec<data_organizer::scanner::FileRecord> {
    Scanner::new(ScanConfig::default())
        .unwrap()
        .scan(root, &mut NullSink)
        .unwrap()
        .files
}

#[test]
fn test_dry_run_never_touches_filesystem() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.log"), b"alpha").unwrap();
    fs::write(src.join("b.log"), b"beta").unwrap();
    let targets = scanned(&src);
    let dest = dir.path().join("dest");

    let executor = Executor::new();
    for action in [
        Action::Move(MoveParams::new(&dest)),
        Action::Delete,
        Action::Compress(CompressParams::default()),
        Action::Tag(TagParams {
            tags: vec!["old".to_string()],
        }),
    ] {
        let result = executor.execute(&action, &targets, true);
        assert!(result.dry_run);
        assert_eq!(result.successes, 2, "{action:?}");
        assert!(result.rollback_records.is_empty());
        assert!(!result.can_rollback);
    }

    assert!(src.join("a.log").exists());
    assert!(src.join("b.log").exists());
    assert!(!dest.exists());
}

#[test]
fn test_move_then_rollback_restores_layout() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("inbox");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("one.txt"), b"1").unwrap();
    fs::write(src.join("nested/two.txt"), b"22").unwrap();
    let targets = scanned(&src);
    let dest = dir.path().join("archive");

    let executor = Executor::new();
    let result = executor.execute(&Action::Move(MoveParams::new(&dest)), &targets, false);

    assert_eq!(result.successes, 2);
    assert_eq!(result.files_moved(), 2);
    assert!(result.can_rollback);
    assert!(dest.join("one.txt").exists());
    assert!(dest.join("two.txt").exists());
    assert!(!src.join("one.txt").exists());

    let rollback = executor.rollback(&result.rollback_records);
    assert!(rollback.all_succeeded());
    assert_eq!(fs::read(src.join("one.txt")).unwrap(), b"1");
    assert_eq!(fs::read(src.join("nested/two.txt")).unwrap(), b"22");
    assert!(!dest.join("one.txt").exists());
}

#[test]
fn test_move_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let dest = dir.path().join("dest");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dest).unwrap();
    fs::write(src.join("same.txt"), b"new").unwrap();
    fs::write(dest.join("same.txt"), b"old").unwrap();

    let result = Executor::new().execute(
        &Action::Move(MoveParams::new(&dest)),
        &scanned(&src),
        false,
    );

    assert_eq!(result.failures, 1);
    assert_eq!(result.errors[0].kind, ErrorKind::DestinationExists);
    assert_eq!(fs::read(dest.join("same.txt")).unwrap(), b"old");
    assert!(src.join("same.txt").exists());
}

#[test]
fn test_delete_then_rollback_restores_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep.me"), b"precious bytes").unwrap();
    let targets = scanned(dir.path());

    let executor = Executor::new();
    let result = executor.execute(&Action::Delete, &targets, false);
    assert_eq!(result.files_deleted(), 1);
    assert_eq!(result.space_freed(), 14);
    assert!(!dir.path().join("keep.me").exists());
    assert!(result.rollback_records[0].is_restorable());

    let rollback = executor.rollback(&result.rollback_records);
    assert_eq!(rollback.successes, 1);
    assert_eq!(fs::read(dir.path().join("keep.me")).unwrap(), b"precious bytes");
}

#[test]
fn test_delete_above_capture_ceiling_is_not_restorable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big.bin"), vec![7u8; 64]).unwrap();
    let targets = scanned(dir.path());

    let executor = Executor::new().with_capture_ceiling(16);
    let result = executor.execute(&Action::Delete, &targets, false);
    assert_eq!(result.successes, 1);
    assert!(!result.rollback_records[0].is_restorable());

    let rollback = executor.rollback(&result.rollback_records);
    assert_eq!(rollback.failures, 1);
    assert_eq!(rollback.errors[0].kind, ErrorKind::ContentUnavailable);
    assert!(!dir.path().join("big.bin").exists());
}

#[test]
fn test_missing_target_does_not_stop_batch() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    fs::write(dir.path().join("b.txt"), b"b").unwrap();
    let targets = scanned(dir.path());
    fs::remove_file(dir.path().join("a.txt")).unwrap();

    let result = Executor::new().execute(&Action::Delete, &targets, false);

    assert_eq!(result.failures, 1);
    assert_eq!(result.successes, 1);
    assert_eq!(result.total_operations(), 2);
    assert_eq!(result.errors[0].kind, ErrorKind::NotFound);
    assert_eq!(result.operations[0].status, OperationStatus::Failed);
    assert_eq!(result.operations[1].status, OperationStatus::Completed);
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_request_with_unknown_action() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    let result = Executor::new().execute_request(
        &ActionRequest::new("delet"),
        &scanned(dir.path()),
        false,
    );

    assert!(result.action.is_none());
    assert!(result.operations.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::UnknownAction);
    assert!(result.errors[0].message.contains("delete"));
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_request_from_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    let request: ActionRequest = serde_json::from_str(
        r#"{"action": "Tag", "params": {"tags": ["stale", "review"]}}"#,
    )
    .unwrap();

    let result = Executor::new().execute_request(&request, &scanned(dir.path()), false);

    assert_eq!(result.action, Some(ActionKind::Tag));
    assert_eq!(result.operations[0].tags, vec!["stale", "review"]);
    assert_eq!(result.operations[0].status, OperationStatus::Completed);
}

#[test]
fn test_real_compress_is_reported_not_implemented() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    let result = Executor::new().execute(
        &Action::Compress(CompressParams::default()),
        &scanned(dir.path()),
        false,
    );

    assert_eq!(result.operations.len(), 1);
    assert_eq!(result.operations[0].status, OperationStatus::NotImplemented);
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_rollback_keeps_files_created_after_execution() {
    let dir = tempdir().unwrap();
    let inbox = dir.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    fs::write(inbox.join("a.txt"), b"old").unwrap();
    fs::write(inbox.join("b.txt"), b"orig").unwrap();
    let targets = scanned(&inbox);
    let dest = dir.path().join("dest");
    let executor = Executor::new();

    let moved = executor.execute(&Action::Move(MoveParams::new(&dest)), &targets[..1], false);
    let deleted = executor.execute(&Action::Delete, &targets[1..], false);
    assert_eq!(moved.successes + deleted.successes, 2);

    // Someone reuses both names before the rollback runs
    fs::write(inbox.join("a.txt"), b"NEW USER DATA").unwrap();
    fs::write(inbox.join("b.txt"), b"NEW B DATA").unwrap();

    let mut records = moved.rollback_records.clone();
    records.extend(deleted.rollback_records.iter().cloned());
    let rollback = executor.rollback(&records);

    assert_eq!(rollback.successes, 0);
    assert_eq!(rollback.failures, 2);
    assert!(rollback
        .errors
        .iter()
        .all(|e| e.kind == ErrorKind::DestinationExists));
    assert_eq!(fs::read(inbox.join("a.txt")).unwrap(), b"NEW USER DATA");
    assert_eq!(fs::read(inbox.join("b.txt")).unwrap(), b"NEW B DATA");
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"old");
}
