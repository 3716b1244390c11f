use data_organizer::duplicates::find_duplicates_with_stats;
use data_organizer::output::{DuplicateCsvOutput, DuplicatesReport};
use data_organizer::scanner::{NullSink, ScanConfig, Scanner};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_then_group_duplicates() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("copies")).unwrap();
    fs::write(dir.path().join("a.txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("copies/a (1).txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("copies/a (2).txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("unique.txt"), b"unique").unwrap();

    let result = Scanner::new(ScanConfig::default())
        .unwrap()
        .scan(dir.path(), &mut NullSink)
        .unwrap();
    let (groups, stats) = find_duplicates_with_stats(&result.files);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[0].size, 9);
    // Root files are emitted before subdirectory files
    assert!(groups[0].files[0].path.ends_with("a.txt"));
    assert_eq!(stats.total_files, 4);
    assert_eq!(stats.duplicate_files, 2);
    assert_eq!(stats.wasted_space, 18);
}

#[test]
fn test_files_above_ceiling_never_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big1.bin"), vec![0u8; 256]).unwrap();
    fs::write(dir.path().join("big2.bin"), vec![0u8; 256]).unwrap();

    let scanner = Scanner::new(ScanConfig::default().with_hash_size_ceiling(100)).unwrap();
    let result = scanner.scan(dir.path(), &mut NullSink).unwrap();
    let (groups, stats) = find_duplicates_with_stats(&result.files);

    assert!(groups.is_empty());
    assert_eq!(stats.unhashed_files, 2);
}

#[test]
fn test_duplicate_reports_serialize() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.txt"), b"same").unwrap();
    fs::write(dir.path().join("y.txt"), b"same").unwrap();

    let result = Scanner::new(ScanConfig::default())
        .unwrap()
        .scan(dir.path(), &mut NullSink)
        .unwrap();
    let (groups, stats) = find_duplicates_with_stats(&result.files);

    let json = serde_json::to_value(DuplicatesReport::new(&groups, &stats)).unwrap();
    assert_eq!(json["summary"]["duplicate_groups"], 1);
    assert_eq!(json["duplicates"][0]["files"].as_array().unwrap().len(), 2);

    let csv = DuplicateCsvOutput::new(&groups).to_string().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "group_id,hash,path,size");
    assert_eq!(lines.len(), 3);
}
