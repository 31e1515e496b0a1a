//! Page-selection and page-order parsing.
//!
//! A page selection is written the way people type it into a form:
//!
//! - `"5"` - a single page
//! - `"3-7"` - an inclusive range of pages
//! - `"1,3-5,9"` - any mix of the above, comma separated
//!
//! Ranges must span at least two pages: `"4-4"` and `"5-3"` are rejected.
//! The parsed [`PageSelection`] is deduplicated and sorted ascending.
//!
//! A page order (for reordering) is a plain comma-separated list of 0-based
//! page indices, parsed by [`parse_page_order`]. Order and duplicates are
//! preserved.
//!
//! # Examples
//!
//! ```
//! use pdfsplice::selection::PageSelection;
//!
//! let selection = PageSelection::parse("1,3-5,2").unwrap();
//! assert_eq!(selection.pages(), &[1, 2, 3, 4, 5]);
//! assert!(PageSelection::parse("4-4").is_err());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{
    InvalidPageOrderError, InvalidPageRangeError, OrderErrorReason, RangeErrorReason,
};

/// Largest number of pages a single range token may expand to.
pub const MAX_RANGE_SPAN: u32 = 1_000_000;

/// A normalized set of 1-based page numbers.
///
/// Values are unique and kept in ascending order. Page numbers are not
/// checked against any document here; see
/// [`remove_pages`](crate::transform::remove_pages) for how out-of-range
/// numbers are treated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSelection {
    pages: Vec<u32>,
}

impl PageSelection {
    /// Parse a page-selection expression.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPageRangeError`] naming the first offending token if
    /// any entry is empty, non-numeric, a malformed range, or a range whose
    /// start is not strictly below its end.
    pub fn parse(input: &str) -> Result<Self, InvalidPageRangeError> {
        let mut pages = BTreeSet::new();

        for (idx, raw) in input.split(',').enumerate() {
            let token = raw.trim();
            let position = idx + 1;
            let fail = |reason| InvalidPageRangeError {
                token: token.to_string(),
                position,
                reason,
            };

            if token.is_empty() {
                return Err(fail(RangeErrorReason::Empty));
            }

            if token.contains('-') {
                let (start, end) = parse_range(token).map_err(fail)?;
                pages.extend(start..=end);
            } else {
                pages.insert(parse_page_number(token).map_err(fail)?);
            }
        }

        Ok(Self {
            pages: pages.into_iter().collect(),
        })
    }

    /// Build a selection from page numbers, deduplicating and sorting them.
    pub fn from_pages<I: IntoIterator<Item = u32>>(pages: I) -> Self {
        let pages: BTreeSet<u32> = pages.into_iter().collect();
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    /// The selected page numbers, ascending.
    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    /// Check if a 1-based page number is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.pages.binary_search(&page).is_ok()
    }

    /// Number of distinct page numbers in the selection.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Count how many selected pages exist in a document of `page_count` pages.
    pub fn count_within(&self, page_count: usize) -> usize {
        self.pages
            .iter()
            .filter(|&&p| p >= 1 && (p as usize) <= page_count)
            .count()
    }
}

impl FromStr for PageSelection {
    type Err = InvalidPageRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PageSelection {
    /// Writes the selection back in compact form, collapsing consecutive runs
    /// of three or more pages into ranges (`1-3,5,7,8`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut idx = 0;
        while idx < self.pages.len() {
            let start = self.pages[idx];
            let mut end = start;
            while idx + 1 < self.pages.len() && self.pages[idx + 1] == end + 1 {
                idx += 1;
                end += 1;
            }

            if !first {
                f.write_str(",")?;
            }
            first = false;

            match end - start {
                0 => write!(f, "{start}")?,
                1 => write!(f, "{start},{end}")?,
                _ => write!(f, "{start}-{end}")?,
            }
            idx += 1;
        }
        Ok(())
    }
}

fn parse_page_number(s: &str) -> Result<u32, RangeErrorReason> {
    let s = s.trim();
    if s.is_empty() {
        return Err(RangeErrorReason::MalformedRange);
    }
    // `u32::from_str` accepts a leading '+', which is not a page number.
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeErrorReason::NotANumber);
    }
    s.parse().map_err(|_| RangeErrorReason::NotANumber)
}

fn parse_range(token: &str) -> Result<(u32, u32), RangeErrorReason> {
    let mut sides = token.split('-');
    let (Some(start), Some(end), None) = (sides.next(), sides.next(), sides.next()) else {
        return Err(RangeErrorReason::MalformedRange);
    };

    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(RangeErrorReason::MalformedRange);
    }

    let start = parse_page_number(start)?;
    let end = parse_page_number(end)?;

    if start > end {
        return Err(RangeErrorReason::ReversedRange);
    }
    if start == end {
        return Err(RangeErrorReason::DegenerateRange);
    }
    if end - start >= MAX_RANGE_SPAN {
        return Err(RangeErrorReason::RangeTooLarge);
    }

    Ok((start, end))
}

/// Parse a comma-separated list of 0-based page indices.
///
/// Order and duplicates are kept exactly as written. Indices are not checked
/// against a document; [`reorder`](crate::transform::reorder) does that.
///
/// # Errors
///
/// Returns [`InvalidPageOrderError`] if the list is empty or any entry is
/// empty or not a non-negative integer.
///
/// # Examples
///
/// ```
/// use pdfsplice::selection::parse_page_order;
///
/// assert_eq!(parse_page_order("2, 0, 0,1").unwrap(), vec![2, 0, 0, 1]);
/// assert!(parse_page_order("1,,2").is_err());
/// ```
pub fn parse_page_order(input: &str) -> Result<Vec<usize>, InvalidPageOrderError> {
    input
        .split(',')
        .enumerate()
        .map(|(idx, raw)| {
            let token = raw.trim();
            let fail = |reason| InvalidPageOrderError {
                token: token.to_string(),
                position: idx + 1,
                reason,
            };

            if token.is_empty() {
                return Err(fail(OrderErrorReason::Empty));
            }
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(fail(OrderErrorReason::NotAnIndex));
            }
            token
                .parse::<usize>()
                .map_err(|_| fail(OrderErrorReason::NotAnIndex))
        })
        .collect()
}

/// Check whether `order` uses every index in `0..page_count` exactly once.
///
/// Reordering does not require this; callers that want a strict permutation
/// can check it first.
pub fn is_permutation(order: &[usize], page_count: usize) -> bool {
    if order.len() != page_count {
        return false;
    }
    let mut seen = vec![false; page_count];
    for &idx in order {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
