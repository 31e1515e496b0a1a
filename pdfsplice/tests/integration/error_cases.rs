//! Integration tests for error handling and edge cases.

use std::path::PathBuf;

use pdfsplice::config::{Config, OverwriteMode};
use pdfsplice::engine::Engine;
use pdfsplice::error::{LoadError, PdfSpliceError, TransformError, WriteError};
use pdfsplice::selection::PageSelection;
use pdfsplice::transform::TransformRequest;
use tempfile::TempDir;

use crate::common::{temp_output_path, write_pdf};

fn keep_all() -> TransformRequest {
    TransformRequest::RemovePages {
        selection: PageSelection::default(),
    }
}

#[tokio::test]
async fn test_error_nonexistent_input() {
    let mut config = Config::new(vec![PathBuf::from("/nonexistent/file.pdf")]);
    config.output = Some(temp_output_path().to_path_buf());

    let err = Engine::new().execute(&config, &keep_all()).await.unwrap_err();
    assert!(matches!(err, PdfSpliceError::Load(LoadError::NotFound { .. })));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_error_not_a_pdf() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.pdf");
    std::fs::write(&input, "just some text").unwrap();

    let mut config = Config::new(vec![input]);
    config.output_dir = dir.path().to_path_buf();

    let err = Engine::new().execute(&config, &keep_all()).await.unwrap_err();
    assert!(matches!(err, PdfSpliceError::Load(LoadError::Malformed { .. })));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_error_empty_input_list() {
    let config = Config::new(vec![]);
    let err = Engine::new().execute(&config, &keep_all()).await.unwrap_err();
    assert!(matches!(err, PdfSpliceError::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_error_output_same_as_input() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 1);

    let mut config = Config::new(vec![input.clone()]);
    config.output = Some(input);
    config.overwrite_mode = OverwriteMode::Force;

    let err = Engine::new().execute(&config, &keep_all()).await.unwrap_err();
    assert!(matches!(err, PdfSpliceError::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_error_reorder_out_of_range_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 2);
    let output = dir.path().join("out.pdf");

    let mut config = Config::new(vec![input]);
    config.output = Some(output.clone());

    let request = TransformRequest::Reorder {
        new_order: vec![0, 99],
    };
    let err = Engine::new().execute(&config, &request).await.unwrap_err();

    match err {
        PdfSpliceError::Transform(TransformError::InvalidIndex(e)) => {
            assert_eq!(e.index, 99);
            assert_eq!(e.page_count, 2);
        }
        other => panic!("expected InvalidIndex, got {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_error_output_exists() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 1);
    let output = dir.path().join("taken.pdf");
    std::fs::write(&output, b"taken").unwrap();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.clone());
    config.overwrite_mode = OverwriteMode::Prompt;

    let err = Engine::new().execute(&config, &keep_all()).await.unwrap_err();
    assert!(matches!(
        err,
        PdfSpliceError::Write(WriteError::OutputExists { .. })
    ));
    assert_eq!(std::fs::read(&output).unwrap(), b"taken");
}

#[tokio::test]
async fn test_error_missing_output_directory() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 1);

    let mut config = Config::new(vec![input]);
    config.output = Some(dir.path().join("missing").join("out.pdf"));

    let err = Engine::new().execute(&config, &keep_all()).await.unwrap_err();
    assert!(matches!(
        err,
        PdfSpliceError::Write(WriteError::CreateOutput { .. })
    ));
}

#[tokio::test]
async fn test_error_page_limit() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a", 3);
    let b = write_pdf(&dir, "b", 3);
    let output = dir.path().join("big.pdf");

    let mut config = Config::new(vec![a, b]);
    config.output = Some(output.clone());
    config.max_output_pages = Some(5);

    let err = Engine::from_config(&config)
        .execute(&config, &TransformRequest::Merge)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PdfSpliceError::PageLimitExceeded { pages: 6, limit: 5 }
    ));
    assert!(!output.exists());
}

#[test]
fn test_error_bad_selection_strings() {
    for input in ["5-3", "4-4", "", "1,,2", "a-b", "1-2-3"] {
        let err: PdfSpliceError = PageSelection::parse(input).unwrap_err().into();
        assert!(err.is_recoverable(), "{input} should be recoverable");
        assert_eq!(err.exit_code(), 1);
    }
}
