#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use vr_recorder::recorder::RecorderConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Scalar(String),
    Seq(Vec<String>),
    Matrix {
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    },
}

/// Minimal reader for the OpenCV YAML written by `MetadataWriter`.
pub fn parse_metadata(text: &str) -> Vec<(String, Entry)> {
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("%YAML:1.0"));
    assert_eq!(lines.next(), Some("---"));

    let field = |line: Option<&str>, name: &str| -> String {
        let line = line.expect("truncated matrix");
        let (k, v) = line.trim().split_once(": ").expect("matrix field");
        assert_eq!(k, name);
        v.to_string()
    };

    let mut entries = Vec::new();
    while let Some(line) = lines.next() {
        let (key, value) = line.split_once(": ").expect("key: value");
        let entry = if value == "!!opencv-matrix" {
            let rows = field(lines.next(), "rows").parse().unwrap();
            let cols = field(lines.next(), "cols").parse().unwrap();
            assert_eq!(field(lines.next(), "dt"), "f");
            let data = parse_seq(&field(lines.next(), "data"))
                .iter()
                .map(|v| parse_float(v))
                .collect();
            Entry::Matrix { rows, cols, data }
        } else if value.starts_with('[') {
            Entry::Seq(parse_seq(value))
        } else {
            Entry::Scalar(value.to_string())
        };
        entries.push((key.to_string(), entry));
    }
    entries
}

fn parse_seq(value: &str) -> Vec<String> {
    let inner = value
        .trim()
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .expect("sequence");
    inner
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn parse_float(v: &str) -> f32 {
    match v {
        ".Nan" => f32::NAN,
        ".Inf" => f32::INFINITY,
        "-.Inf" => f32::NEG_INFINITY,
        _ => v.parse().unwrap(),
    }
}

pub fn read_metadata(dir: &Path) -> Vec<(String, Entry)> {
    parse_metadata(&std::fs::read_to_string(dir.join("pose.yaml")).unwrap())
}

pub fn get<'a>(entries: &'a [(String, Entry)], key: &str) -> Option<&'a Entry> {
    entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
}

pub fn count_keys_with_prefix(entries: &[(String, Entry)], prefix: &str) -> usize {
    entries
        .iter()
        .filter(|(k, _)| {
            k.strip_prefix(prefix)
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        })
        .count()
}

pub fn jpg_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut paths: Vec<_> = glob::glob(&format!("{}/*.jpg", dir.display()))
        .unwrap()
        .filter_map(Result::ok)
        .collect();
    paths.sort();
    paths
}

pub fn test_config(dir: &Path, frame_count: usize) -> RecorderConfig {
    RecorderConfig {
        frame_count,
        output_dir: dir.to_path_buf(),
        poll_interval: Duration::from_millis(1),
        frame_timeout: Duration::from_millis(200),
        ..Default::default()
    }
}
