//! Convert-and-retain integration tests
//!
//! Uses a stub engine that writes a fresh result file, the way the real
//! external converter would, and verifies the retention pass that follows.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use converter_lsp::convert::converter::Converter;
use converter_lsp::convert::engine::{ConversionEngine, ConversionResult};
use converter_lsp::convert::error::{ConversionError, EngineError};
use converter_lsp::convert::history::RetentionPolicy;

/// Engine stub that writes a predetermined result file.
struct StubEngine {
    result_file: PathBuf,
}

#[async_trait]
impl ConversionEngine for StubEngine {
    async fn process(&self, _data_file: &Path) -> Result<ConversionResult, EngineError> {
        tokio::fs::write(&self.result_file, b"{}").await?;
        Ok(ConversionResult {
            result_file: self.result_file.clone(),
        })
    }
}

/// Engine stub that always fails.
struct FailingEngine;

#[async_trait]
impl ConversionEngine for FailingEngine {
    async fn process(&self, _data_file: &Path) -> Result<ConversionResult, EngineError> {
        Err(EngineError::Failed {
            code: Some(1),
            stderr: "template not found".to_string(),
        })
    }
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"{}").unwrap();
    path
}

fn converter(
    engine: Arc<dyn ConversionEngine>,
    root: &Path,
    max: usize,
    remain: usize,
) -> Converter {
    Converter::new(engine, root, RetentionPolicy::new(max, remain).unwrap())
}

#[tokio::test]
async fn convert_returns_the_engine_result_and_bounds_the_history() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    touch(root, "patient-123.20240101000000.json");
    touch(root, "patient-123.20240102000000.json");
    touch(root, "patient-123.20240103000000.json");

    let newest = root.join("patient-123.20240104000000.json");
    let engine = Arc::new(StubEngine {
        result_file: newest.clone(),
    });

    let result = converter(engine, root, 2, 1)
        .convert(Path::new("/data/patient-123.hl7"))
        .await
        .unwrap();

    assert_eq!(result.result_file, newest);

    // only the remain window survives, and it is the freshest artifact
    let mut remaining: Vec<_> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["patient-123.20240104000000.json"]);
}

#[tokio::test]
async fn convert_below_threshold_leaves_the_history_alone() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    touch(root, "patient-123.20240101000000.json");

    let engine = Arc::new(StubEngine {
        result_file: root.join("patient-123.20240102000000.json"),
    });

    converter(engine, root, 5, 2)
        .convert(Path::new("/data/patient-123.hl7"))
        .await
        .unwrap();

    assert_eq!(fs::read_dir(root).unwrap().count(), 2);
}

#[tokio::test]
async fn engine_failure_is_fatal_and_propagates() {
    let temp_dir = TempDir::new().unwrap();

    let err = converter(Arc::new(FailingEngine), temp_dir.path(), 2, 1)
        .convert(Path::new("/data/patient-123.hl7"))
        .await
        .unwrap_err();

    let ConversionError::Engine(EngineError::Failed { code, stderr }) = err else {
        panic!("expected an engine failure");
    };
    assert_eq!(code, Some(1));
    assert_eq!(stderr, "template not found");
}

/// Write-protects `dir` so unlinking from it fails, and proves it with a
/// sacrificial file. Returns false (with permissions restored) when the
/// protection does not bind, e.g. for root, where unlink permission checks
/// do not apply; callers skip the test in that case.
#[cfg(unix)]
fn write_protect(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let canary = dir.join("canary");
    fs::write(&canary, b"").unwrap();
    fs::set_permissions(dir, fs::Permissions::from_mode(0o555)).unwrap();

    if fs::remove_file(&canary).is_ok() {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
        return false;
    }
    true
}

#[cfg(unix)]
#[tokio::test]
async fn eviction_failure_does_not_fail_the_conversion() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let locked_dir = root.join("locked");
    fs::create_dir_all(&locked_dir).unwrap();

    let locked = touch(&locked_dir, "patient-123.20240101000000.json");
    touch(root, "patient-123.20240102000000.json");
    touch(root, "patient-123.20240103000000.json");

    if !write_protect(&locked_dir) {
        eprintln!("skipping: directory write protection is not enforced for this user");
        return;
    }

    let newest = root.join("patient-123.20240104000000.json");
    let engine = Arc::new(StubEngine {
        result_file: newest.clone(),
    });

    // 4 artifacts against maxCount=2, remainCount=1: the locked one cannot
    // be deleted, yet the conversion itself must still succeed
    let result = converter(engine, root, 2, 1)
        .convert(Path::new("/data/patient-123.hl7"))
        .await;

    fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.unwrap().result_file, newest);
    assert!(newest.exists());
    assert!(locked.exists());
}

#[tokio::test]
async fn get_history_derives_the_logical_name_from_the_identifier() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    touch(root, "patient-123.20240101000000.json");
    touch(root, "patient-123.20240102000000.json");
    touch(root, "patient-456.20240101000000.json");

    let engine = Arc::new(FailingEngine);
    let history = converter(engine, root, 10, 5)
        .get_history(Path::new("/elsewhere/patient-123.20240199000000.json"))
        .await
        .unwrap();

    assert_eq!(
        history
            .iter()
            .map(|a| a.file_name().to_string())
            .collect::<Vec<_>>(),
        vec![
            "patient-123.20240102000000.json",
            "patient-123.20240101000000.json",
        ]
    );
}
