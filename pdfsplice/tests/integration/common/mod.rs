//! Shared helpers for the integration tests.
//!
//! Test documents are generated with lopdf rather than read from fixtures.
//! Page `n` of a document labelled `doc` draws the text `(doc-n)`, which
//! [`page_markers`] reads back after a round trip through disk.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tempfile::TempDir;

/// Build a document with `page_count` labelled pages.
///
/// `MediaBox` and `Resources` are set on the page-tree root only.
pub fn build_pdf(label: &str, page_count: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (1..=page_count)
        .map(|page_num| {
            let content = format!("BT /F1 10 Tf 72 720 Td ({label}-{page_num}) Tj ET");
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Write a labelled document into `dir` as `<label>.pdf`.
pub fn write_pdf(dir: &TempDir, label: &str, page_count: u32) -> PathBuf {
    let path = dir.path().join(format!("{label}.pdf"));
    build_pdf(label, page_count)
        .save(&path)
        .expect("Failed to write test PDF");
    path
}

/// Write a labelled document whose pages at `annotated` (0-based) carry a
/// Text annotation and its Popup.
pub fn write_annotated_pdf(
    dir: &TempDir,
    label: &str,
    page_count: u32,
    annotated: &[usize],
) -> PathBuf {
    let path = dir.path().join(format!("{label}.pdf"));
    let mut doc = build_pdf(label, page_count);
    for &index in annotated {
        annotate_page(&mut doc, index);
    }
    doc.save(&path).expect("Failed to write test PDF");
    path
}

/// Add a Text annotation and its Popup to page `index`, both with `P` set
/// back to the page.
pub fn annotate_page(doc: &mut Document, index: usize) {
    let page_id = doc
        .get_pages()
        .into_values()
        .nth(index)
        .expect("No such page");
    let note_id = doc.new_object_id();
    let popup_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Popup",
        "Rect" => vec![72.into(), 760.into(), 272.into(), 820.into()],
        "Parent" => note_id,
        "P" => page_id,
    });
    doc.objects.insert(
        note_id,
        Object::Dictionary(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Text",
            "Rect" => vec![72.into(), 740.into(), 92.into(), 760.into()],
            "Contents" => Object::string_literal("review me"),
            "P" => page_id,
            "Popup" => popup_id,
        }),
    );
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .expect("Page is not a dictionary")
        .set("Annots", vec![Object::Reference(note_id), Object::Reference(popup_id)]);
}

/// Annotation ids listed on a page, empty when it has none.
pub fn page_annotations(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    doc.get_dictionary(page_id)
        .expect("Page is not a dictionary")
        .get(b"Annots")
        .and_then(Object::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_reference().expect("Annotation is not indirect"))
                .collect()
        })
        .unwrap_or_default()
}

/// The page an annotation's `P` entry points at.
pub fn annotation_page(doc: &Document, annotation: ObjectId) -> ObjectId {
    doc.get_dictionary(annotation)
        .expect("Annotation is not a dictionary")
        .get(b"P")
        .and_then(Object::as_reference)
        .expect("Annotation has no page")
}

/// Decoded text of every stream object in `doc`.
pub fn stream_texts(doc: &Document) -> Vec<String> {
    doc.objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .map(|stream| {
            let bytes = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            String::from_utf8_lossy(&bytes).into_owned()
        })
        .collect()
}

/// Load a written document back from disk.
pub fn reload(path: &Path) -> Document {
    Document::load(path).expect("Failed to reload output PDF")
}

/// The marker drawn on each page, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc
                .get_page_content(page_id)
                .expect("Page has no content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').expect("No marker on page") + 1;
            let end = text.find(')').expect("Unterminated marker");
            text[start..end].to_string()
        })
        .collect()
}

/// Create a temporary output path for test results.
pub fn temp_output_path() -> tempfile::TempPath {
    let path = tempfile::NamedTempFile::new()
        .expect("Failed to create temp file")
        .into_temp_path();
    // Only the name is needed; the writer refuses to replace existing files.
    std::fs::remove_file(&path).expect("Failed to clear temp file");
    path
}
