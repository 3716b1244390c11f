use data_organizer::scanner::{
    directory_tree, Category, ChannelSink, FileRecord, NullSink, ScanConfig, ScanError, Scanner,
    SinkError,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn scanner() -> Scanner {
    Scanner::new(ScanConfig::default()).unwrap()
}

#[test]
fn test_scan_counts_files_dirs_and_bytes() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("docs/report.pdf"), b"%PDF-1.4");
    write(&dir.path().join("docs/deep/photo.jpg"), b"jpegdata!");

    let result = scanner().scan(dir.path(), &mut NullSink).unwrap();

    assert_eq!(result.total_files, 3);
    // docs and docs/deep; the root itself is not counted
    assert_eq!(result.total_directories, 2);
    assert_eq!(result.total_size, 5 + 8 + 9);
    assert!(result.errors.is_empty());
    assert!(!result.interrupted);
    assert!(result.completed_at.is_some());
}

#[test]
fn test_scan_emits_each_directory_files_before_its_subdirectories() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("b/inner.txt"), b"1");
    write(&dir.path().join("a.txt"), b"2");
    write(&dir.path().join("c.txt"), b"3");
    write(&dir.path().join("b/z/leaf.txt"), b"4");
    write(&dir.path().join("b/y.txt"), b"5");

    let mut order = Vec::new();
    let mut sink = |r: &FileRecord| -> Result<(), SinkError> {
        order.push(r.path.strip_prefix(dir.path()).unwrap().to_path_buf());
        Ok(())
    };
    let result = Scanner::new(ScanConfig::default().with_worker_threads(3))
        .unwrap()
        .scan(dir.path(), &mut sink)
        .unwrap();

    let expected: Vec<_> = ["a.txt", "c.txt", "b/inner.txt", "b/y.txt", "b/z/leaf.txt"]
        .iter()
        .map(Path::new)
        .map(Path::to_path_buf)
        .collect();
    assert_eq!(order, expected);
    assert_eq!(result.total_directories, 2);
}

#[test]
fn test_scan_records_are_categorized_and_hashed() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("main.py"), b"print('hi')");
    write(&dir.path().join("notes.md"), b"# notes");
    write(&dir.path().join("Makefile"), b"all:");

    let result = scanner().scan(dir.path(), &mut NullSink).unwrap();
    let by_name = |name: &str| -> &FileRecord {
        result.files.iter().find(|f| f.name == name).unwrap()
    };

    let py = by_name("main.py");
    assert_eq!(py.category, Category::Code);
    assert_eq!(py.extension.as_deref(), Some(".py"));
    assert!(py.hash.is_some());
    assert!(py.path.is_absolute());
    assert!(py.modified_at.is_some());

    assert_eq!(by_name("notes.md").category, Category::Document);
    assert_eq!(by_name("Makefile").extension, None);
}

#[test]
fn test_scan_hash_ceiling_omits_digest() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("small.bin"), &[1u8; 10]);
    write(&dir.path().join("large.bin"), &[2u8; 100]);

    let scanner = Scanner::new(ScanConfig::default().with_hash_size_ceiling(50)).unwrap();
    let result = scanner.scan(dir.path(), &mut NullSink).unwrap();

    let small = result.files.iter().find(|f| f.name == "small.bin").unwrap();
    let large = result.files.iter().find(|f| f.name == "large.bin").unwrap();
    assert!(small.hash.is_some());
    assert!(large.hash.is_none());
    assert_eq!(large.size, 100);
}

#[test]
fn test_scan_identical_content_same_digest() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one.txt"), b"same bytes");
    write(&dir.path().join("sub/two.txt"), b"same bytes");
    write(&dir.path().join("three.txt"), b"other bytes");

    let result = scanner().scan(dir.path(), &mut NullSink).unwrap();
    let hash = |name: &str| result.files.iter().find(|f| f.name == name).unwrap().hash;

    assert_eq!(hash("one.txt"), hash("two.txt"));
    assert_ne!(hash("one.txt"), hash("three.txt"));
}

#[test]
fn test_scan_depth_limit() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("top.txt"), b"0");
    write(&dir.path().join("l1/one.txt"), b"1");
    write(&dir.path().join("l1/l2/two.txt"), b"2");

    let scanner = Scanner::new(ScanConfig::default().with_max_depth(1)).unwrap();
    let result = scanner.scan(dir.path(), &mut NullSink).unwrap();

    let names: Vec<&str> = result.files.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"top.txt"));
    assert!(names.contains(&"one.txt"));
    assert!(!names.contains(&"two.txt"));
}

#[test]
fn test_scan_hidden_policy() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("visible.txt"), b"v");
    write(&dir.path().join(".hidden.txt"), b"h");
    write(&dir.path().join(".git/config"), b"c");

    let result = scanner().scan(dir.path(), &mut NullSink).unwrap();
    assert_eq!(result.total_files, 1);

    let scanner = Scanner::new(ScanConfig::default().with_include_hidden(true)).unwrap();
    let result = scanner.scan(dir.path(), &mut NullSink).unwrap();
    assert_eq!(result.total_files, 3);
}

#[test]
fn test_scan_streams_through_channel_sink() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(&dir.path().join(format!("f{i}.txt")), b"x");
    }

    let (mut sink, receiver) = ChannelSink::unbounded();
    let result = scanner().scan(dir.path(), &mut sink).unwrap();
    drop(sink);

    let streamed: Vec<FileRecord> = receiver.iter().collect();
    assert_eq!(streamed.len(), 5);
    assert_eq!(streamed, result.files);
}

#[test]
fn test_scan_sink_failure_does_not_abort() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"a");
    write(&dir.path().join("b.txt"), b"b");

    let mut failing = |_: &FileRecord| -> Result<(), SinkError> {
        Err(SinkError::Rejected("storage offline".to_string()))
    };
    let result = scanner().scan(dir.path(), &mut failing).unwrap();

    assert_eq!(result.total_files, 2);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_scan_invalid_roots() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    write(&file, b"x");

    assert!(matches!(
        scanner().scan(&dir.path().join("missing"), &mut NullSink),
        Err(ScanError::NotFound(_))
    ));
    assert!(matches!(
        scanner().scan(&file, &mut NullSink),
        Err(ScanError::NotADirectory(_))
    ));
}

#[test]
fn test_directory_tree_shape() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("b.txt"), b"b");
    write(&dir.path().join("a/inner.txt"), b"i");

    let tree = directory_tree(dir.path(), 5, false).unwrap();

    assert!(tree.is_directory);
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b.txt"]);
    assert_eq!(tree.children[0].children[0].name, "inner.txt");
    assert_eq!(tree.descendant_count(), 3);
}

#[test]
fn test_directory_tree_missing_root() {
    let dir = tempdir().unwrap();
    assert!(directory_tree(&dir.path().join("nope"), 3, false).is_err());
}

#[cfg(unix)]
#[test]
fn test_scan_permission_denied_is_isolated() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(&dir.path().join("ok.txt"), b"fine");
    write(&dir.path().join("locked/secret.txt"), b"hidden");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = scanner().scan(dir.path(), &mut NullSink).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.total_files, 1);
    assert_eq!(result.files[0].name, "ok.txt");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].kind,
        data_organizer::error::ErrorKind::PermissionDenied
    );
    assert!(result.errors[0].path.as_ref().unwrap().ends_with("locked"));
}

#[test]
fn test_scan_reports_modification_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dated.txt");
    write(&path, b"old news");
    let mtime = filetime::FileTime::from_unix_time(1_600_000_000, 0);
    filetime::set_file_mtime(&path, mtime).unwrap();

    let result = scanner().scan(dir.path(), &mut NullSink).unwrap();

    let modified = result.files[0].modified_at.unwrap();
    assert_eq!(modified.timestamp(), 1_600_000_000);
}
