//! Ordering of note listings

use crate::NoteMetadata;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field a note listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteFinderSortType {
    Title,
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteFinderSortDirection {
    Asc,
    Desc,
}

/// Granularity of a listing's date filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteFinderDateFilterType {
    Month,
    Date,
}

impl NoteFinderSortType {
    fn compare(&self, a: &NoteMetadata, b: &NoteMetadata) -> Ordering {
        match self {
            Self::Title => a.title.cmp(&b.title),
            Self::Created => a.created_datetime().cmp(&b.created_datetime()),
            // `None` orders before any timestamp
            Self::Updated => a.updated_datetime.cmp(&b.updated_datetime),
        }
    }
}

/// Sorts a listing in place. The sort is stable.
pub fn sort_metadata(
    notes: &mut [NoteMetadata],
    sort_type: NoteFinderSortType,
    direction: NoteFinderSortDirection,
) {
    notes.sort_by(|a, b| {
        let ordering = sort_type.compare(a, b);
        match direction {
            NoteFinderSortDirection::Asc => ordering,
            NoteFinderSortDirection::Desc => ordering.reverse(),
        }
    });
}
