use crate::error::AdapterResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Word a location block is recognised by, in its class or its text
pub const LOCATION_HINT: &str = "location";

/// Content extent of the page at one point in time (document scroll height)
///
/// Readings are only comparable with earlier readings from the same session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageMetric(pub i64);

/// Adapter-neutral description of an element lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Probe {
    /// A CSS selector
    Css(String),
    /// Any element whose class contains `location`, or whose
    /// whitespace-normalized text contains it in any letter case
    LocationHint,
}

impl Probe {
    pub fn css(selector: impl Into<String>) -> Self {
        Probe::Css(selector.into())
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Css(selector) => write!(f, "css({})", selector),
            Probe::LocationHint => write!(f, "location-hint"),
        }
    }
}

/// Read and scroll access to one live page session
///
/// Implementations represent a single serialized browser session. Callers
/// must not issue commands concurrently against the same adapter.
#[async_trait]
pub trait DomAdapter: Send + Sync {
    /// Handle to one element; only valid within the current session
    type Element: Clone + Send + Sync;

    /// All elements in the document matching the probe, in document order.
    /// Zero matches is an empty vector, not an error.
    async fn query(&self, probe: &Probe) -> AdapterResult<Vec<Self::Element>>;

    /// Current content extent of the page
    async fn measure_extent(&self) -> AdapterResult<PageMetric>;

    /// Scroll the viewport to the bottom of the current content
    async fn scroll_to_extent(&self) -> AdapterResult<()>;

    /// Visible text of the element
    async fn text(&self, element: &Self::Element) -> AdapterResult<String>;

    /// Raw attribute value, `None` when the attribute is absent
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> AdapterResult<Option<String>>;

    /// Link target of the element
    async fn href(&self, element: &Self::Element) -> AdapterResult<Option<String>> {
        self.attribute(element, "href").await
    }

    /// First descendant (document order, excluding the element itself)
    /// matching the probe
    async fn find_descendant(
        &self,
        element: &Self::Element,
        probe: &Probe,
    ) -> AdapterResult<Option<Self::Element>>;

    /// Parent element, `None` at the document root
    async fn parent(&self, element: &Self::Element) -> AdapterResult<Option<Self::Element>>;
}
