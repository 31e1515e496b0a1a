//! Loaded source documents and handles to their pages.

use lopdf::{Document, ObjectId};
use uuid::Uuid;

use crate::transform::PageSequence;

/// A loaded PDF owned by the caller for the lifetime of one request.
///
/// Each source gets a fresh id, so page handles from different documents
/// (or from two loads of the same file) never get mixed up.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    id: Uuid,
    original_name: String,
    document: Document,
}

impl SourceDocument {
    /// Wrap a parsed document under the given display name.
    pub fn new(original_name: impl Into<String>, document: Document) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name: original_name.into(),
            document,
        }
    }

    /// Unique id of this source.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// File name (or label) the document was loaded from.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// The underlying parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the underlying document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// PDF header version, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.document.version
    }

    /// Number of indirect objects in the document.
    pub fn object_count(&self) -> usize {
        self.document.objects.len()
    }

    /// The document's pages, in page-tree order.
    pub fn pages(&self) -> PageSequence<PageHandle> {
        self.document
            .get_pages()
            .into_values()
            .enumerate()
            .map(|(index, object_id)| PageHandle {
                source: self.id,
                index,
                object_id,
            })
            .collect()
    }
}

/// A reference to one page of a [`SourceDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle {
    source: Uuid,
    index: usize,
    object_id: ObjectId,
}

impl PageHandle {
    /// Id of the owning source document.
    pub fn source(&self) -> Uuid {
        self.source
    }

    /// 0-based index of the page within its source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Object id of the page dictionary in its source.
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }
}
