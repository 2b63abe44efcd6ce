use std::fs;
use std::path::PathBuf;

use pointcount::naming::{paired_export_paths, unique_export_path};

/// Fresh scratch directory per test.
fn scratch(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pointcount_naming_{tag}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn first_counter_in_an_empty_directory() {
    let dir = scratch("empty");
    let base = dir.join("img.tif");
    let path = unique_export_path(&base, Some("csv")).unwrap();
    assert_eq!(path, Some(dir.join("img_point_count_1.csv")));
}

#[test]
fn skips_existing_files() {
    let dir = scratch("skip");
    let base = dir.join("img.tif");
    fs::write(dir.join("img_point_count_1.csv"), b"").unwrap();
    let path = unique_export_path(&base, Some("csv")).unwrap();
    assert_eq!(path, Some(dir.join("img_point_count_2.csv")));
}

#[test]
fn disabled_extension_yields_no_path() {
    let dir = scratch("disabled");
    let path = unique_export_path(&dir.join("img.tif"), None).unwrap();
    assert_eq!(path, None);
}

#[test]
fn paired_counters_bump_together() {
    // Only the CSV candidate collides; the PNG counter must follow anyway so
    // the surviving pair matches by number.
    let dir = scratch("paired");
    let base = dir.join("img.tif");
    fs::write(dir.join("img_point_count_1.csv"), b"").unwrap();
    let (data, figure) = paired_export_paths(&base, Some("csv"), Some("png")).unwrap();
    assert_eq!(data, Some(dir.join("img_point_count_2.csv")));
    assert_eq!(figure, Some(dir.join("img_point_count_2.png")));
}

#[test]
fn identical_extensions_disable_both() {
    let dir = scratch("identical");
    let (data, figure) = paired_export_paths(&dir.join("img.tif"), Some("csv"), Some("csv")).unwrap();
    assert_eq!(data, None);
    assert_eq!(figure, None);
}

#[test]
fn paired_with_one_side_disabled() {
    let dir = scratch("oneside");
    let base = dir.join("img.tif");
    let (data, figure) = paired_export_paths(&base, None, Some("png")).unwrap();
    assert_eq!(data, None);
    assert_eq!(figure, Some(dir.join("img_point_count_1.png")));

    let (data, figure) = paired_export_paths(&base, Some("pkl"), None).unwrap();
    assert_eq!(data, Some(dir.join("img_point_count_1.pkl")));
    assert_eq!(figure, None);
}

#[test]
fn exhausted_counters_are_a_hard_error() {
    // Every candidate number taken: refusing is the contract, never a silent
    // overwrite of the last candidate.
    let dir = scratch("exhausted");
    let base = dir.join("img.tif");
    for n in 1..=999 {
        fs::write(dir.join(format!("img_point_count_{n}.csv")), b"").unwrap();
    }
    assert!(unique_export_path(&base, Some("csv")).is_err());
    // The paired variant gives up just the same when one side is saturated.
    assert!(paired_export_paths(&base, Some("csv"), Some("png")).is_err());
}

#[test]
fn strips_only_the_final_extension() {
    let dir = scratch("stem");
    let path = unique_export_path(&dir.join("stack.layer1.tif"), Some("csv")).unwrap();
    assert_eq!(path, Some(dir.join("stack.layer1_point_count_1.csv")));
}
