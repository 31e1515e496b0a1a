//! Integration tests for annotated pages.
//!
//! Annotations point back at their page through `P`. Output files must keep
//! those links inside the new page tree and must not drag removed pages along.

use lopdf::ObjectId;
use pdfsplice::config::{CompressionLevel, Config};
use pdfsplice::engine::Engine;
use pdfsplice::selection::PageSelection;
use pdfsplice::transform::TransformRequest;
use tempfile::TempDir;

use crate::common::{
    annotation_page, page_annotations, page_markers, reload, stream_texts, temp_output_path,
    write_annotated_pdf, write_pdf,
};

#[tokio::test]
async fn test_split_drops_removed_pages_of_annotated_document() {
    let dir = TempDir::new().unwrap();
    let input = write_annotated_pdf(&dir, "notes", 3, &[0]);
    let output = temp_output_path();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.to_path_buf());
    config.compression = CompressionLevel::None;

    let request = TransformRequest::RemovePages {
        selection: PageSelection::parse("2-3").unwrap(),
    };
    let artifact = Engine::new().execute(&config, &request).await.unwrap();
    assert_eq!(artifact.page_count, 1);

    let bytes = std::fs::read(&output).unwrap();
    let raw = String::from_utf8_lossy(&bytes);
    assert!(raw.contains("(notes-1)"));
    assert!(!raw.contains("(notes-2)"));
    assert!(!raw.contains("(notes-3)"));

    let doc = reload(&output);
    assert_eq!(page_markers(&doc), vec!["notes-1"]);
    let page_id = *doc.get_pages().values().next().unwrap();
    let annotations = page_annotations(&doc, page_id);
    assert_eq!(annotations.len(), 2);
    for annotation in annotations {
        assert_eq!(annotation_page(&doc, annotation), page_id);
    }
}

#[tokio::test]
async fn test_reorder_duplicates_get_distinct_annotations() {
    let dir = TempDir::new().unwrap();
    let input = write_annotated_pdf(&dir, "dup", 1, &[0]);
    let output = temp_output_path();

    let mut config = Config::new(vec![input]);
    config.output = Some(output.to_path_buf());

    let request = TransformRequest::Reorder {
        new_order: vec![0, 0],
    };
    Engine::new().execute(&config, &request).await.unwrap();

    let doc = reload(&output);
    assert_eq!(page_markers(&doc), vec!["dup-1", "dup-1"]);

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let first = page_annotations(&doc, page_ids[0]);
    let second = page_annotations(&doc, page_ids[1]);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert!(first.iter().all(|id| !second.contains(id)));
    assert!(first.iter().all(|&id| annotation_page(&doc, id) == page_ids[0]));
    assert!(second.iter().all(|&id| annotation_page(&doc, id) == page_ids[1]));

    let content = |page_id: ObjectId| {
        doc.get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_reference()
            .unwrap()
    };
    assert_eq!(content(page_ids[0]), content(page_ids[1]));
}

#[tokio::test]
async fn test_merge_keeps_annotations_with_their_pages() {
    let dir = TempDir::new().unwrap();
    let first = write_pdf(&dir, "plain", 2);
    let second = write_annotated_pdf(&dir, "marked", 2, &[1]);
    let output = temp_output_path();

    let mut config = Config::new(vec![first, second]);
    config.output = Some(output.to_path_buf());

    Engine::new()
        .execute(&config, &TransformRequest::Merge)
        .await
        .unwrap();

    let doc = reload(&output);
    assert_eq!(
        page_markers(&doc),
        vec!["plain-1", "plain-2", "marked-1", "marked-2"]
    );

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let annotated: Vec<usize> = page_ids
        .iter()
        .enumerate()
        .filter(|&(_, &id)| !page_annotations(&doc, id).is_empty())
        .map(|(index, _)| index)
        .collect();
    assert_eq!(annotated, vec![3]);
    for annotation in page_annotations(&doc, page_ids[3]) {
        assert_eq!(annotation_page(&doc, annotation), page_ids[3]);
    }
    assert_eq!(stream_texts(&doc).len(), 4);
}
