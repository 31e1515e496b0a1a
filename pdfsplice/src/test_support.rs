//! Helpers for building small PDFs in unit tests.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// Build an `n`-page document whose page `i` draws the text `(<label>-<i+1>)`.
///
/// `MediaBox` and `Resources` live on the `Pages` node only, so pages rely on
/// inheritance for both.
pub fn build_pdf(label: &str, page_count: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for page_num in 1..=page_count {
        let content = format!("BT /F1 12 Tf 50 700 Td ({label}-{page_num}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(label),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc
}

/// Read back the `(<label>-<n>)` marker drawn on each page, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').unwrap() + 1;
            let end = text.find(')').unwrap();
            text[start..end].to_string()
        })
        .collect()
}

/// Attach a Text annotation with a Popup to page `index` (0-based).
///
/// Both annotations carry `P` back to the page, the way viewers write them.
/// Returns the Text annotation's id.
pub fn annotate_page(doc: &mut Document, index: usize) -> ObjectId {
    let page_id = doc.get_pages().into_values().nth(index).unwrap();
    let note_id = doc.new_object_id();
    let popup_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Popup",
        "Rect" => vec![20.into(), 720.into(), 220.into(), 780.into()],
        "Parent" => note_id,
        "P" => page_id,
    });
    doc.objects.insert(
        note_id,
        Object::Dictionary(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Text",
            "Rect" => vec![20.into(), 700.into(), 40.into(), 720.into()],
            "Contents" => Object::string_literal("note"),
            "P" => page_id,
            "Popup" => popup_id,
        }),
    );
    doc.get_object_mut(page_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set("Annots", vec![Object::Reference(note_id), Object::Reference(popup_id)]);
    note_id
}

/// Ids of the annotations listed in a page's `Annots` array.
pub fn page_annotations(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"Annots")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item.as_reference().unwrap())
        .collect()
}

/// Text of every stream object left in `doc`, reachable or not.
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
