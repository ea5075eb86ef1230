//! Configuration parsing, defaults, overrides and validation.
//!
//! Run with: `cargo test`

use std::path::PathBuf;
use std::time::Duration;

use s3fs::config::{BackendKind, Config, ConfigOverrides, DEFAULT_CONFIG, DEFAULT_PART_FILE_BYTES};
use s3fs::fleet::RateLimit;
use s3fs::FsError;

const FULL: &str = r#"
[s3]
bucket = "archive"
region = "eu-west-1"
endpoint = "http://127.0.0.1:9000"
workers = 8
max_concurrent_reads = 4
rate_interval_ms = 5
rate_burst = 50

[filesystem]
base_dir = "/var/lib/s3fs"
part_file_bytes = 1048576
backend = "local"
"#;

#[test]
fn test_parse_full_config() {
    let cfg = Config::from_toml(FULL).expect("parse");
    cfg.validate().expect("valid");

    assert_eq!(cfg.s3.bucket, "archive");
    assert_eq!(cfg.s3.region, "eu-west-1");
    assert_eq!(cfg.s3.endpoint.as_deref(), Some("http://127.0.0.1:9000"));
    assert_eq!(cfg.s3.workers, 8);
    assert_eq!(cfg.s3.max_concurrent_reads, 4);
    assert_eq!(cfg.filesystem.base_dir, PathBuf::from("/var/lib/s3fs"));
    assert_eq!(cfg.filesystem.part_file_bytes, 1_048_576);
    assert_eq!(cfg.filesystem.backend, BackendKind::Local);
    assert_eq!(
        cfg.rate_limit(),
        RateLimit { interval: Duration::from_millis(5), burst: 50 }
    );
}

#[test]
fn test_defaults_fill_missing_fields() {
    let cfg = Config::from_toml("[s3]\nbucket = \"b\"\n").expect("parse");
    cfg.validate().expect("valid");

    assert_eq!(cfg.s3.region, "us-east-1");
    assert_eq!(cfg.s3.workers, 20);
    assert_eq!(cfg.s3.max_concurrent_reads, 20);
    assert_eq!(cfg.filesystem.part_file_bytes, DEFAULT_PART_FILE_BYTES);
    assert_eq!(cfg.filesystem.backend, BackendKind::S3);
    assert_eq!(cfg.rate_limit(), RateLimit::default());
}

#[test]
fn test_default_config_text_is_valid() {
    let cfg = Config::from_toml(DEFAULT_CONFIG).expect("parse");
    cfg.validate().expect("valid");
    if dirs::home_dir().is_some() {
        assert!(!cfg.filesystem.base_dir.to_string_lossy().starts_with("$HOME"));
    }
}

#[test]
fn test_validation_errors() {
    let missing_bucket = Config::from_toml("").expect("parse");
    assert!(matches!(missing_bucket.validate(), Err(FsError::Config(_))));

    for bad in [
        "[s3]\nbucket = \"b\"\nworkers = 0\n",
        "[s3]\nbucket = \"b\"\nmax_concurrent_reads = 0\n",
        "[s3]\nbucket = \"b\"\nrate_burst = 0\n",
        "[s3]\nbucket = \"b\"\n[filesystem]\npart_file_bytes = 0\n",
    ] {
        let cfg = Config::from_toml(bad).expect("parse");
        assert!(cfg.validate().is_err(), "accepted: {bad}");
    }

    assert!(Config::from_toml("[s3\nbucket=").is_err());
    assert!(Config::from_toml("[filesystem]\nbackend = \"ftp\"\n").is_err());
}

#[test]
fn test_overrides_replace_only_given_values() {
    let mut cfg = Config::from_toml(FULL).expect("parse");
    cfg.apply(ConfigOverrides {
        bucket: Some("other".into()),
        workers: Some(3),
        backend: Some(BackendKind::Memory),
        ..Default::default()
    });

    assert_eq!(cfg.s3.bucket, "other");
    assert_eq!(cfg.s3.workers, 3);
    assert_eq!(cfg.filesystem.backend, BackendKind::Memory);
    assert_eq!(cfg.s3.region, "eu-west-1");
    assert_eq!(cfg.filesystem.part_file_bytes, 1_048_576);
}

#[test]
fn test_load_from_explicit_path() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("s3fs.toml");
    std::fs::write(&path, FULL).expect("write config");

    let cfg = Config::load(Some(path.as_path()), ConfigOverrides {
        part_file_bytes: Some(64),
        ..Default::default()
    })
    .expect("load");
    assert_eq!(cfg.filesystem.part_file_bytes, 64);

    let invalid = Config::load(Some(path.as_path()), ConfigOverrides {
        max_concurrent_reads: Some(0),
        ..Default::default()
    });
    assert!(invalid.is_err());

    let missing = dir.path().join("missing.toml");
    assert!(Config::load(Some(missing.as_path()), ConfigOverrides::default()).is_err());
}

#[test]
fn test_backend_kind_from_str() {
    assert_eq!("S3".parse::<BackendKind>().unwrap(), BackendKind::S3);
    assert_eq!("local".parse::<BackendKind>().unwrap(), BackendKind::Local);
    assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    assert!("ftp".parse::<BackendKind>().is_err());
}
