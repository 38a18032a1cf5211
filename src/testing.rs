//! Scripted adapters for exercising the pipeline without a browser

use crate::dom::{DomAdapter, PageMetric, Probe, SnapshotDom, SnapshotElement};
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Adapter that replays a fixed sequence of extent readings
///
/// `None` readings, and reads past the end of the script, fail like a
/// dropped WebDriver command would.
pub struct ScriptedDom {
    readings: Mutex<VecDeque<Option<i64>>>,
    failing_scrolls: HashSet<usize>,
    scrolls: AtomicUsize,
    measurements: AtomicUsize,
}

impl ScriptedDom {
    pub fn with_metrics(metrics: impl IntoIterator<Item = i64>) -> Self {
        Self::with_readings(metrics.into_iter().map(Some).collect())
    }

    pub fn with_readings(readings: Vec<Option<i64>>) -> Self {
        Self {
            readings: Mutex::new(readings.into()),
            failing_scrolls: HashSet::new(),
            scrolls: AtomicUsize::new(0),
            measurements: AtomicUsize::new(0),
        }
    }

    /// Make the given scroll calls (1-based) fail
    pub fn failing_scrolls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_scrolls = calls.into_iter().collect();
        self
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn measurements(&self) -> usize {
        self.measurements.load(Ordering::SeqCst)
    }
}

fn dropped(what: &str) -> AdapterError {
    AdapterError::Command(format!("scripted failure: {}", what))
}

#[async_trait]
impl DomAdapter for ScriptedDom {
    type Element = usize;

    async fn query(&self, _probe: &Probe) -> AdapterResult<Vec<usize>> {
        Ok(Vec::new())
    }

    async fn measure_extent(&self) -> AdapterResult<PageMetric> {
        self.measurements.fetch_add(1, Ordering::SeqCst);
        let next = self
            .readings
            .lock()
            .map_err(|_| dropped("poisoned"))?
            .pop_front();
        next.flatten().map(PageMetric).ok_or_else(|| dropped("measure"))
    }

    async fn scroll_to_extent(&self) -> AdapterResult<()> {
        let call = self.scrolls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_scrolls.contains(&call) {
            return Err(dropped("scroll"));
        }
        Ok(())
    }

    async fn text(&self, element: &usize) -> AdapterResult<String> {
        Err(AdapterError::StaleElement(*element))
    }

    async fn attribute(&self, element: &usize, _name: &str) -> AdapterResult<Option<String>> {
        Err(AdapterError::StaleElement(*element))
    }

    async fn find_descendant(&self, element: &usize, _probe: &Probe) -> AdapterResult<Option<usize>> {
        Err(AdapterError::StaleElement(*element))
    }

    async fn parent(&self, element: &usize) -> AdapterResult<Option<usize>> {
        Err(AdapterError::StaleElement(*element))
    }
}

/// Snapshot adapter with selected operations forced to fail
pub struct FlakyDom {
    inner: SnapshotDom,
    fail_text: bool,
    fail_attributes: HashSet<String>,
    fail_descendants: bool,
    fail_parent: bool,
    fail_queries: HashSet<String>,
    queries: AtomicUsize,
}

impl FlakyDom {
    pub fn new(html: &str) -> Self {
        Self {
            inner: SnapshotDom::new(html),
            fail_text: false,
            fail_attributes: HashSet::new(),
            fail_descendants: false,
            fail_parent: false,
            fail_queries: HashSet::new(),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn failing_text(mut self) -> Self {
        self.fail_text = true;
        self
    }

    pub fn failing_attribute(mut self, name: &str) -> Self {
        self.fail_attributes.insert(name.to_string());
        self
    }

    pub fn failing_descendants(mut self) -> Self {
        self.fail_descendants = true;
        self
    }

    pub fn failing_parent(mut self) -> Self {
        self.fail_parent = true;
        self
    }

    pub fn failing_query(mut self, selector: &str) -> Self {
        self.fail_queries.insert(selector.to_string());
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomAdapter for FlakyDom {
    type Element = SnapshotElement;

    async fn query(&self, probe: &Probe) -> AdapterResult<Vec<SnapshotElement>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Probe::Css(selector) = probe {
            if self.fail_queries.contains(selector) {
                return Err(dropped("query"));
            }
        }
        self.inner.query(probe).await
    }

    async fn measure_extent(&self) -> AdapterResult<PageMetric> {
        self.inner.measure_extent().await
    }

    async fn scroll_to_extent(&self) -> AdapterResult<()> {
        self.inner.scroll_to_extent().await
    }

    async fn text(&self, element: &SnapshotElement) -> AdapterResult<String> {
        if self.fail_text {
            return Err(dropped("text"));
        }
        self.inner.text(element).await
    }

    async fn attribute(
        &self,
        element: &SnapshotElement,
        name: &str,
    ) -> AdapterResult<Option<String>> {
        if self.fail_attributes.contains(name) {
            return Err(dropped("attribute"));
        }
        self.inner.attribute(element, name).await
    }

    async fn find_descendant(
        &self,
        element: &SnapshotElement,
        probe: &Probe,
    ) -> AdapterResult<Option<SnapshotElement>> {
        if self.fail_descendants {
            return Err(dropped("find_descendant"));
        }
        self.inner.find_descendant(element, probe).await
    }

    async fn parent(&self, element: &SnapshotElement) -> AdapterResult<Option<SnapshotElement>> {
        if self.fail_parent {
            return Err(dropped("parent"));
        }
        self.inner.parent(element).await
    }
}
