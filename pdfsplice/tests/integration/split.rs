//! Integration tests for removing pages.

use pdfsplice::config::{Config, OverwriteMode};
use pdfsplice::engine::Engine;
use pdfsplice::io::PdfReader;
use pdfsplice::selection::PageSelection;
use pdfsplice::transform::TransformRequest;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_markers, reload, temp_output_path, write_pdf};

fn remove(selection: &str) -> TransformRequest {
    TransformRequest::RemovePages {
        selection: PageSelection::parse(selection).unwrap(),
    }
}

#[rstest]
#[case("2", vec!["doc-1", "doc-3", "doc-4", "doc-5"])]
#[case("1,3-5,2", vec![])]
#[case("1-2,5", vec!["doc-3", "doc-4"])]
#[case("5,40", vec!["doc-1", "doc-2", "doc-3", "doc-4"])]
#[case("90-99", vec!["doc-1", "doc-2", "doc-3", "doc-4", "doc-5"])]
#[tokio::test]
async fn test_split_removes_selected_pages(#[case] selection: &str, #[case] expected: Vec<&str>) {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 5);
    let output = temp_output_path();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.to_path_buf());

    let artifact = Engine::new()
        .execute(&config, &remove(selection))
        .await
        .unwrap();

    assert_eq!(artifact.page_count, expected.len());
    assert_eq!(page_markers(&reload(&output)), expected);
}

#[tokio::test]
async fn test_split_output_is_loadable_source() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 4);
    let output = temp_output_path();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.to_path_buf());
    Engine::new().execute(&config, &remove("1")).await.unwrap();

    // The result can be fed straight back in.
    let source = PdfReader::new().load(&output).await.unwrap();
    assert_eq!(source.page_count(), 3);

    let page_id = *source.document().get_pages().values().next().unwrap();
    let page = source.document().get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box[3].as_i64().unwrap(), 842);
}

#[tokio::test]
async fn test_split_force_overwrites() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 3);
    let output = dir.path().join("result.pdf");
    std::fs::write(&output, b"stale").unwrap();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.clone());
    config.overwrite_mode = OverwriteMode::Force;

    Engine::new().execute(&config, &remove("3")).await.unwrap();
    assert_eq!(page_markers(&reload(&output)), vec!["doc-1", "doc-2"]);
}

#[tokio::test]
async fn test_split_generated_name_in_output_dir() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 2);
    let out_dir = TempDir::new().unwrap();

    let mut config = Config::new(vec![input]);
    config.output_dir = out_dir.path().to_path_buf();

    let first = Engine::new().execute(&config, &remove("1")).await.unwrap();
    let second = Engine::new().execute(&config, &remove("1")).await.unwrap();

    assert_ne!(first.path, second.path);
    for artifact in [&first, &second] {
        assert_eq!(artifact.path.parent(), Some(out_dir.path()));
        let name = artifact.path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("split_"));
        assert!(name.ends_with(".pdf"));
    }
}
