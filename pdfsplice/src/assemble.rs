//! Turning a page sequence back into a PDF document.
//!
//! The assembler builds a fresh [`Document`] from the pages chosen by a
//! transformation:
//!
//! - every object of each source is imported with its ids shifted past the
//!   previous source, so sources never collide
//! - each output page gets its own page dictionary, a shallow copy of the
//!   source page; content streams and resources stay shared
//! - each output page gets its own copies of its annotations, whose `P`
//!   points at that page
//! - references into the source page trees are redirected to the copied
//!   pages, or nulled when the page was dropped, so removed pages do not
//!   survive pruning
//! - inheritable attributes (`Resources`, `MediaBox`, `CropBox`, `Rotate`)
//!   are copied down from the source page tree onto each page
//! - a single flat `Pages` node and a new `Catalog` tie it together
//! - the `Info` dictionary of the first source is carried over
//! - objects no longer reachable from the trailer are pruned

use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use uuid::Uuid;

use crate::document::{PageHandle, SourceDocument};
use crate::error::AssembleError;
use crate::transform::PageSequence;

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Header version used when no source supplies one.
const DEFAULT_VERSION: &str = "1.5";

/// Builds output documents from page sequences.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    producer: String,
}

impl DocumentAssembler {
    /// Create an assembler that stamps `pdfsplice <version>` as the producer.
    pub fn new() -> Self {
        Self {
            producer: format!("{} {}", crate::NAME, crate::VERSION),
        }
    }

    /// Use a custom `Producer` value in the output's Info dictionary.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Build a document whose pages are `pages`, in order.
    ///
    /// `sources` must include every document a handle in `pages` points into.
    /// The first source provides the Info dictionary.
    ///
    /// # Errors
    ///
    /// - [`AssembleError::UnknownSource`] if a handle's document is not in `sources`
    /// - [`AssembleError::MissingPage`] if a handle's page object is gone
    /// - [`AssembleError::Structure`] if a page object is not a dictionary
    /// - [`AssembleError::IdSpaceExhausted`] if the combined ids overflow
    pub fn assemble(
        &self,
        sources: &[&SourceDocument],
        pages: &PageSequence<PageHandle>,
    ) -> Result<Document, AssembleError> {
        let mut doc = Document::with_version(output_version(sources));

        let mut offsets: HashMap<Uuid, (u32, &SourceDocument)> = HashMap::new();
        let mut tree_nodes: HashSet<ObjectId> = HashSet::new();
        let mut next_offset: u32 = 0;
        for source in sources {
            import_objects(&mut doc, source.document(), next_offset)?;
            for id in page_tree_nodes(source.document()) {
                tree_nodes.insert(shift_id(id, next_offset)?);
            }
            offsets.insert(source.id(), (next_offset, *source));
            next_offset = next_offset
                .checked_add(source.document().max_id)
                .ok_or(AssembleError::IdSpaceExhausted)?;
        }
        doc.max_id = next_offset;

        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(pages.page_count());
        let mut first_copies: HashMap<ObjectId, ObjectId> = HashMap::new();
        for handle in pages {
            let &(offset, source) = offsets.get(&handle.source()).ok_or(
                AssembleError::UnknownSource {
                    index: handle.index(),
                },
            )?;
            let source_page_id = shift_id(handle.object_id(), offset)?;
            let mut page = copy_page(&doc, source_page_id, pages_id).map_err(|err| match err {
                PageCopyError::Missing => AssembleError::MissingPage {
                    index: handle.index(),
                    source_name: source.original_name().to_string(),
                },
                PageCopyError::NotADictionary => AssembleError::Structure(format!(
                    "page {} of '{}' is not a dictionary",
                    handle.index(),
                    source.original_name()
                )),
            })?;
            let page_id = doc.new_object_id();
            copy_annotations(&mut doc, &mut page, page_id);
            doc.objects.insert(page_id, Object::Dictionary(page));
            first_copies.entry(source_page_id).or_insert(page_id);
            kids.push(Object::Reference(page_id));
        }

        // Links into the source page trees now point at the first copy of
        // each kept page; links to dropped pages become null.
        let retarget = |id: ObjectId| {
            tree_nodes.contains(&id).then(|| {
                first_copies
                    .get(&id)
                    .map_or(Object::Null, |&copy| Object::Reference(copy))
            })
        };
        for object in doc.objects.values_mut() {
            rewrite_references(object, &retarget);
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = sources
            .first()
            .and_then(|first| {
                let offset = offsets.get(&first.id()).map_or(0, |&(offset, _)| offset);
                carried_info(&doc, first.document(), offset)
            })
            .unwrap_or_default();
        info.set("Producer", Object::string_literal(self.producer.as_str()));
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        doc.prune_objects();
        Ok(doc)
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Highest header version among the sources.
fn output_version(sources: &[&SourceDocument]) -> String {
    sources
        .iter()
        .map(|s| s.version())
        .max_by(|a, b| compare_versions(a, b))
        .unwrap_or(DEFAULT_VERSION)
        .to_string()
}

fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    let parse = |v: &str| -> (u32, u32) {
        let mut parts = v.split('.').map(|p| p.trim().parse().unwrap_or(0));
        (parts.next().unwrap_or(0), parts.next().unwrap_or(0))
    };
    parse(a).cmp(&parse(b))
}

fn shift_id(id: ObjectId, offset: u32) -> Result<ObjectId, AssembleError> {
    let number = id
        .0
        .checked_add(offset)
        .ok_or(AssembleError::IdSpaceExhausted)?;
    Ok((number, id.1))
}

/// Rewrite every reference inside `object` by `offset`.
fn shift_references(object: &mut Object, offset: u32) -> Result<(), AssembleError> {
    match object {
        Object::Reference(id) => *id = shift_id(*id, offset)?,
        Object::Array(items) => {
            for item in items {
                shift_references(item, offset)?;
            }
        }
        Object::Dictionary(dict) => shift_dictionary(dict, offset)?,
        Object::Stream(stream) => shift_dictionary(&mut stream.dict, offset)?,
        _ => {}
    }
    Ok(())
}

fn shift_dictionary(dict: &mut Dictionary, offset: u32) -> Result<(), AssembleError> {
    for (_, value) in dict.iter_mut() {
        shift_references(value, offset)?;
    }
    Ok(())
}

fn import_objects(dest: &mut Document, source: &Document, offset: u32) -> Result<(), AssembleError> {
    for (&id, object) in &source.objects {
        let mut object = object.clone();
        if offset != 0 {
            shift_references(&mut object, offset)?;
        }
        dest.objects.insert(shift_id(id, offset)?, object);
    }
    Ok(())
}

/// Ids of every `Page` and `Pages` node in `doc`.
fn page_tree_nodes(doc: &Document) -> HashSet<ObjectId> {
    let mut nodes: HashSet<ObjectId> = doc
        .objects
        .iter()
        .filter(|(_, object)| is_page_tree_node(object))
        .map(|(&id, _)| id)
        .collect();
    nodes.extend(doc.get_pages().into_values());
    nodes
}

fn is_page_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}

/// Replace every reference inside `object` for which `rewrite` returns a value.
fn rewrite_references<F>(object: &mut Object, rewrite: &F)
where
    F: Fn(ObjectId) -> Option<Object>,
{
    match object {
        Object::Reference(id) => {
            let id = *id;
            if let Some(replacement) = rewrite(id) {
                *object = replacement;
            }
        }
        Object::Array(items) => {
            for item in items {
                rewrite_references(item, rewrite);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                rewrite_references(value, rewrite);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                rewrite_references(value, rewrite);
            }
        }
        _ => {}
    }
}

/// Give `page` its own copies of its annotations, each pointing back at
/// `page_id`.
///
/// References between annotations of the same page (`Popup`, `Parent`,
/// `IRT`) are kept within the copied set.
fn copy_annotations(doc: &mut Document, page: &mut Dictionary, page_id: ObjectId) {
    let annotations = match page.get(b"Annots") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match doc.objects.get(id) {
            Some(Object::Array(items)) => items.clone(),
            _ => return,
        },
        _ => return,
    };

    let mut copies: HashMap<ObjectId, ObjectId> = HashMap::new();
    for item in &annotations {
        if let Object::Reference(id) = item
            && !copies.contains_key(id)
            && doc.objects.get(id).is_some_and(|o| o.as_dict().is_ok())
        {
            copies.insert(*id, doc.new_object_id());
        }
    }

    let within_page = |id: ObjectId| copies.get(&id).map(|&copy| Object::Reference(copy));
    let mut copied = Vec::with_capacity(copies.len());
    for (&original, &copy) in &copies {
        if let Some(object) = doc.objects.get(&original) {
            copied.push((copy, object.clone()));
        }
    }
    for (copy, mut object) in copied {
        rewrite_references(&mut object, &within_page);
        if let Object::Dictionary(dict) = &mut object {
            dict.set("P", page_id);
        }
        doc.objects.insert(copy, object);
    }

    let items = annotations
        .into_iter()
        .map(|mut item| {
            rewrite_references(&mut item, &within_page);
            if let Object::Dictionary(dict) = &mut item {
                dict.set("P", page_id);
            }
            item
        })
        .collect::<Vec<_>>();
    page.set("Annots", items);
}

enum PageCopyError {
    Missing,
    NotADictionary,
}

/// Copy a page dictionary, pull inherited attributes down onto it and hang
/// it under `parent`.
fn copy_page(doc: &Document, page_id: ObjectId, parent: ObjectId) -> Result<Dictionary, PageCopyError> {
    let object = doc.objects.get(&page_id).ok_or(PageCopyError::Missing)?;
    let mut page = object
        .as_dict()
        .map_err(|_| PageCopyError::NotADictionary)?
        .clone();

    let ancestor = page.get(b"Parent").and_then(Object::as_reference).ok();
    for key in INHERITABLE_ATTRIBUTES {
        if page.has(key) {
            continue;
        }
        if let Some(value) = ancestor.and_then(|id| inherited_attribute(doc, id, key)) {
            page.set(key, value);
        }
    }

    page.set("Parent", parent);
    Ok(page)
}

/// Walk up the page tree from `node` looking for `key`.
fn inherited_attribute(doc: &Document, node: ObjectId, key: &[u8]) -> Option<Object> {
    let mut visited = HashSet::new();
    let mut current = Some(node);

    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let dict = doc.objects.get(&id)?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// The source's Info dictionary, resolved from the already shifted import.
fn carried_info(doc: &Document, source: &Document, offset: u32) -> Option<Dictionary> {
    match source.trailer.get(b"Info").ok()? {
        Object::Reference(id) => {
            let id = shift_id(*id, offset).ok()?;
            doc.objects.get(&id)?.as_dict().ok().cloned()
        }
        Object::Dictionary(dict) => {
            let mut dict = dict.clone();
            shift_dictionary(&mut dict, offset).ok()?;
            Some(dict)
        }
        _ => None,
    }
}
