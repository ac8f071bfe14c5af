// tests/output_tests.rs

mod support;

use palette_harvest::app;
use palette_harvest::config::{Config, OutputConfig};
use palette_harvest::writer::{read_json, write_csv, write_json};
use palette_harvest::{Collector, PaletteRecord};
use std::fs;
use support::{item, RecordingSleeper, ScriptedFeed};
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.output = OutputConfig {
        json_path: dir.join("palettes.json"),
        csv_path: dir.join("palettes.csv"),
    };
    config
}

#[test]
fn empty_results_write_empty_array_and_header() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    app::write_outputs(&[], &config.output).unwrap();

    assert_eq!(fs::read_to_string(&config.output.json_path).unwrap(), "[]");
    assert_eq!(
        fs::read_to_string(&config.output.csv_path).unwrap(),
        "id;color1;color2;color3;color4;likes;date\r\n"
    );
}

#[test]
fn writers_overwrite_existing_files() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("out.json");
    let csv = dir.path().join("out.csv");
    fs::write(&json, "x".repeat(4096)).unwrap();
    fs::write(&csv, "y".repeat(4096)).unwrap();

    let records = vec![PaletteRecord::from_code("F9ED69F08A5DB83B5E6A2C70", 12, "1 day").unwrap()];
    write_json(&records, &json).unwrap();
    write_csv(&records, &csv).unwrap();

    assert_eq!(read_json(&json).unwrap(), records);
    let text = fs::read_to_string(&csv).unwrap();
    assert!(!text.contains('y'));
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn writing_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("palettes.json");
    let err = write_json(&[], &path).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test_log::test]
fn collect_and_write_produces_both_files() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.collect.target_count = 2;

    let feed = ScriptedFeed::new(vec![vec![
        item("F9ED69F08A5DB83B5E6A2C70", "1523"),
        item("08D9D6252A34FF2E63EAEAEA", "87"),
        item("E23E57883252522546311D3F", "40"),
    ]]);
    let mut collector = Collector::with_sleeper(feed, RecordingSleeper::default());
    let records = app::collect_and_write(&mut collector, &config).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(read_json(&config.output.json_path).unwrap(), records);
    assert_eq!(
        fs::read_to_string(&config.output.csv_path).unwrap(),
        "id;color1;color2;color3;color4;likes;date\r\n\
         F9ED69F08A5DB83B5E6A2C70;#F9ED69;#F08A5D;#B83B5E;#6A2C70;1523;2023-01-01\r\n\
         08D9D6252A34FF2E63EAEAEA;#08D9D6;#252A34;#FF2E63;#EAEAEA;87;2023-01-01\r\n"
    );
}

#[test_log::test]
fn failed_collection_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    let feed = ScriptedFeed::new(vec![vec![item("F9ED69F08A5DB83B5E6A2C70", "1")]]).then_fail();
    let mut collector = Collector::with_sleeper(feed, RecordingSleeper::default());
    let err = app::collect_and_write(&mut collector, &config).unwrap_err();

    assert!(format!("{err:#}").contains("503"));
    assert!(!config.output.json_path.exists());
    assert!(!config.output.csv_path.exists());
}
