//! Integration tests for reordering pages.

use lopdf::ObjectId;
use pdfsplice::config::Config;
use pdfsplice::engine::Engine;
use pdfsplice::selection::parse_page_order;
use pdfsplice::transform::TransformRequest;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_markers, reload, temp_output_path, write_pdf};

#[rstest]
#[case("3,2,1,0", vec!["doc-4", "doc-3", "doc-2", "doc-1"])]
#[case("0,0,1", vec!["doc-1", "doc-1", "doc-2"])]
#[case("2", vec!["doc-3"])]
#[case("1, 3, 0, 2", vec!["doc-2", "doc-4", "doc-1", "doc-3"])]
#[tokio::test]
async fn test_reorder(#[case] order: &str, #[case] expected: Vec<&str>) {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 4);
    let output = temp_output_path();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.to_path_buf());

    let request = TransformRequest::Reorder {
        new_order: parse_page_order(order).unwrap(),
    };
    let artifact = Engine::new().execute(&config, &request).await.unwrap();

    assert_eq!(artifact.page_count, expected.len());
    assert_eq!(page_markers(&reload(&output)), expected);
}

#[tokio::test]
async fn test_duplicated_pages_share_content_stream() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc", 2);
    let output = temp_output_path();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.to_path_buf());

    let request = TransformRequest::Reorder {
        new_order: vec![1, 1],
    };
    Engine::new().execute(&config, &request).await.unwrap();

    let doc = reload(&output);
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    assert_eq!(pages.len(), 2);
    assert_ne!(pages[0], pages[1]);

    let contents: Vec<ObjectId> = pages
        .iter()
        .map(|&id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"Contents")
                .unwrap()
                .as_reference()
                .unwrap()
        })
        .collect();
    assert_eq!(contents[0], contents[1]);
}
