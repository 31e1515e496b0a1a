//! Page-level document transformations.
//!
//! Documents are treated as ordered sequences of opaque pages. The three
//! operations never look inside a page and never mutate their inputs; each
//! returns a fresh [`PageSequence`].
//!
//! ```
//! use pdfsplice::selection::PageSelection;
//! use pdfsplice::transform::{self, PageSequence};
//!
//! let doc: PageSequence<char> = "abcd".chars().collect();
//! let selection = PageSelection::parse("2-3").unwrap();
//!
//! let kept = transform::remove_pages(&doc, &selection);
//! assert_eq!(kept.pages(), &['a', 'd']);
//!
//! let reordered = transform::reorder(&doc, &[3, 0, 0]).unwrap();
//! assert_eq!(reordered.pages(), &['d', 'a', 'a']);
//! ```

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidIndexError, TransformError};
use crate::selection::PageSelection;

/// The kind of transformation that produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Pages were removed from one document.
    Split,
    /// Two documents were concatenated.
    Merge,
    /// One document's pages were rearranged.
    Reorder,
}

impl Operation {
    /// Prefix used when naming artifacts of this operation.
    pub fn artifact_prefix(&self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Merge => "merged",
            Self::Reorder => "reordered",
        }
    }

    /// Number of source documents the operation consumes.
    pub fn source_count(&self) -> usize {
        match self {
            Self::Split | Self::Reorder => 1,
            Self::Merge => 2,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Split => "split",
            Self::Merge => "merge",
            Self::Reorder => "reorder",
        };
        f.write_str(name)
    }
}

/// An ordered sequence of pages.
///
/// `P` is whatever identifies a page to the caller: a [`PageHandle`] for
/// real documents, or any small value in tests.
///
/// [`PageHandle`]: crate::document::PageHandle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSequence<P> {
    pages: Vec<P>,
}

impl<P> PageSequence<P> {
    /// Create a sequence from pages in document order.
    pub fn new(pages: Vec<P>) -> Self {
        Self { pages }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the sequence has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in order.
    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    /// Page at a 0-based index.
    pub fn get(&self, index: usize) -> Option<&P> {
        self.pages.get(index)
    }

    /// Iterate over pages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.pages.iter()
    }

    /// Take the pages out of the sequence.
    pub fn into_pages(self) -> Vec<P> {
        self.pages
    }
}

impl<P> Default for PageSequence<P> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<P> FromIterator<P> for PageSequence<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

impl<P> Index<usize> for PageSequence<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.pages[index]
    }
}

impl<'a, P> IntoIterator for &'a PageSequence<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Drop every page whose 1-based number is in `selection`.
///
/// Numbers outside `1..=page_count` match nothing and are ignored. Removing
/// every page yields an empty sequence.
pub fn remove_pages<P: Clone>(doc: &PageSequence<P>, selection: &PageSelection) -> PageSequence<P> {
    doc.iter()
        .enumerate()
        .filter(|(idx, _)| {
            // A page number that does not fit in u32 cannot be selected.
            u32::try_from(idx + 1).map_or(true, |number| !selection.contains(number))
        })
        .map(|(_, page)| page.clone())
        .collect()
}

/// Concatenate two documents: all of `first`, then all of `second`.
pub fn merge<P: Clone>(first: &PageSequence<P>, second: &PageSequence<P>) -> PageSequence<P> {
    first.iter().chain(second.iter()).cloned().collect()
}

/// Build a document whose page `i` is `doc[new_order[i]]`.
///
/// Indices may repeat or be left out. Every index is checked before any
/// output is built, so a bad index never yields a partial document.
///
/// # Errors
///
/// Returns [`InvalidIndexError`] for the first index that is not below
/// `doc.page_count()`.
pub fn reorder<P: Clone>(
    doc: &PageSequence<P>,
    new_order: &[usize],
) -> Result<PageSequence<P>, InvalidIndexError> {
    let page_count = doc.page_count();
    if let Some((position, &index)) = new_order
        .iter()
        .enumerate()
        .find(|&(_, &index)| index >= page_count)
    {
        return Err(InvalidIndexError {
            index,
            position,
            page_count,
        });
    }

    Ok(new_order.iter().map(|&idx| doc[idx].clone()).collect())
}

/// A single transformation to apply to one or two source documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRequest {
    /// Remove the selected 1-based pages.
    RemovePages {
        /// Pages to drop.
        selection: PageSelection,
    },
    /// Concatenate two documents in argument order.
    Merge,
    /// Rearrange pages by 0-based index.
    Reorder {
        /// Source index of each output page.
        new_order: Vec<usize>,
    },
}

impl TransformRequest {
    /// The operation this request performs.
    pub fn operation(&self) -> Operation {
        match self {
            Self::RemovePages { .. } => Operation::Split,
            Self::Merge => Operation::Merge,
            Self::Reorder { .. } => Operation::Reorder,
        }
    }

    /// Apply the request to its source documents.
    ///
    /// Split and reorder take exactly one source, merge takes two.
    ///
    /// # Errors
    ///
    /// - [`TransformError::SourceCount`] if the wrong number of sources is given
    /// - [`TransformError::InvalidIndex`] if a reorder index is out of range
    pub fn apply<P: Clone>(
        &self,
        sources: &[&PageSequence<P>],
    ) -> Result<PageSequence<P>, TransformError> {
        let operation = self.operation();
        let expected = operation.source_count();
        if sources.len() != expected {
            return Err(TransformError::SourceCount {
                operation,
                expected,
                found: sources.len(),
            });
        }

        let output = match self {
            Self::RemovePages { selection } => remove_pages(sources[0], selection),
            Self::Merge => merge(sources[0], sources[1]),
            Self::Reorder { new_order } => reorder(sources[0], new_order)?,
        };
        Ok(output)
    }
}
