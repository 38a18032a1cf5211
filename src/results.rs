use serde::{Deserialize, Serialize};

/// Fields pulled from a single candidate element before deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    /// Title, if any strategy produced one
    pub title: Option<String>,

    /// Location, if any strategy produced one
    pub location: Option<String>,

    /// Link target of the candidate, already trimmed
    pub href: String,
}

impl PartialRecord {
    /// Create a partial record with no title or location yet
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            title: None,
            location: None,
            href: href.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The deduplication key for this record
    pub fn identity(&self) -> &str {
        self.href.trim()
    }
}

/// One listing in the final output, serialized as a `title,location,link` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Listing title (may be empty)
    pub title: String,

    /// Listing location (may be empty)
    pub location: String,

    /// Unique link to the listing
    pub link: String,
}

impl ListingRecord {
    /// Build the output record, turning missing fields into empty strings
    pub fn from_partial(partial: PartialRecord) -> Self {
        let link = partial.identity().to_string();
        Self {
            title: partial.title.unwrap_or_default(),
            location: partial.location.unwrap_or_default(),
            link,
        }
    }
}

/// Outcome of the convergence scroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleResult {
    /// Whether the page extent stopped changing before the cycle budget ran out
    pub converged: bool,

    /// Number of scroll cycles performed
    pub cycles_used: usize,
}

/// Everything a single harvest produced
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub settle: SettleResult,

    /// Candidate elements matched across all patterns, overlap included
    pub candidates: usize,

    /// Candidates dropped for lacking a usable href
    pub discarded: usize,

    /// Deduplicated records in first-seen order
    pub records: Vec<ListingRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_partial_fills_missing_fields() {
        let record = ListingRecord::from_partial(PartialRecord::new("  /jobs/7 "));
        assert_eq!(record.title, "");
        assert_eq!(record.location, "");
        assert_eq!(record.link, "/jobs/7");
    }

    #[test]
    fn test_from_partial_keeps_fields() {
        let partial = PartialRecord::new("/jobs/8")
            .with_title("Data Engineer")
            .with_location("Remote");
        let record = ListingRecord::from_partial(partial);
        assert_eq!(record.title, "Data Engineer");
        assert_eq!(record.location, "Remote");
    }
}
