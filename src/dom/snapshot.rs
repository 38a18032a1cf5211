use crate::dom::adapter::{DomAdapter, LOCATION_HINT, PageMetric, Probe};
use crate::error::{AdapterError, AdapterResult};
use crate::utils::normalize_space;
use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Handle into a [`SnapshotDom`]: the element's position in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotElement(pub usize);

/// One parsed document with its elements indexed in document order
#[derive(Debug)]
struct Frame {
    doc: Html,
    order: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    location_hinted: Vec<bool>,
}

impl Frame {
    fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let (order, location_hinted) = {
            let elements: Vec<ElementRef<'_>> = doc
                .root_element()
                .descendants()
                .filter_map(ElementRef::wrap)
                .collect();
            let order: Vec<NodeId> = elements.iter().map(|e| e.id()).collect();
            let hinted: Vec<bool> = elements.iter().map(has_location_hint).collect();
            (order, hinted)
        };
        let positions = order
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();

        Self {
            doc,
            order,
            positions,
            location_hinted,
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn element(&self, handle: &SnapshotElement) -> AdapterResult<ElementRef<'_>> {
        self.order
            .get(handle.0)
            .and_then(|id| self.doc.tree.get(*id))
            .and_then(ElementRef::wrap)
            .ok_or(AdapterError::StaleElement(handle.0))
    }

    fn handle_of(&self, element: &ElementRef<'_>) -> Option<SnapshotElement> {
        self.positions.get(&element.id()).copied().map(SnapshotElement)
    }

    fn matches(&self, matcher: &Matcher, element: &ElementRef<'_>) -> bool {
        match matcher {
            Matcher::Css(selector) => selector.matches(element),
            Matcher::LocationHint => self
                .positions
                .get(&element.id())
                .is_some_and(|index| self.location_hinted[*index]),
        }
    }
}

/// DOM adapter over static HTML documents
///
/// Holds one or more frames. Each scroll advances to the next frame, which
/// lets a saved page (or a test fixture) stand in for content that arrives
/// while scrolling. The extent metric is the element count of the current
/// frame, so it stops changing once the last frame is reached.
///
/// Frames are parsed once, up front.
#[derive(Debug)]
pub struct SnapshotDom {
    frames: Vec<Mutex<Frame>>,
    current: AtomicUsize,
}

impl SnapshotDom {
    /// Adapter over a single, fully loaded document
    pub fn new(html: impl Into<String>) -> Self {
        Self::with_frames(vec![html.into()])
    }

    /// Adapter that reveals the given documents one scroll at a time
    pub fn with_frames(frames: Vec<String>) -> Self {
        let mut frames: Vec<Mutex<Frame>> = frames
            .iter()
            .map(|html| Mutex::new(Frame::parse(html)))
            .collect();
        if frames.is_empty() {
            frames.push(Mutex::new(Frame::parse("")));
        }
        Self {
            frames,
            current: AtomicUsize::new(0),
        }
    }

    /// Load a saved page from disk
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Ok(Self::new(html))
    }

    /// Index of the frame currently shown
    pub fn frame(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    fn current_frame(&self) -> AdapterResult<MutexGuard<'_, Frame>> {
        let index = self.frame().min(self.frames.len() - 1);
        self.frames[index]
            .lock()
            .map_err(|_| AdapterError::Command("snapshot frame lock poisoned".to_string()))
    }
}

/// Compiled form of a probe
enum Matcher {
    Css(Selector),
    LocationHint,
}

impl Matcher {
    fn compile(probe: &Probe) -> AdapterResult<Self> {
        match probe {
            Probe::Css(selector) => Selector::parse(selector)
                .map(Matcher::Css)
                .map_err(|e| AdapterError::InvalidProbe {
                    probe: probe.to_string(),
                    reason: e.to_string(),
                }),
            Probe::LocationHint => Ok(Matcher::LocationHint),
        }
    }
}

fn has_location_hint(element: &ElementRef<'_>) -> bool {
    let in_class = element
        .value()
        .attr("class")
        .is_some_and(|class| class.contains(LOCATION_HINT));
    in_class || element_text(element).to_lowercase().contains(LOCATION_HINT)
}

/// Text nodes concatenated as rendered, then whitespace-collapsed
fn element_text(element: &ElementRef<'_>) -> String {
    normalize_space(&element.text().collect::<String>())
}

#[async_trait]
impl DomAdapter for SnapshotDom {
    type Element = SnapshotElement;

    async fn query(&self, probe: &Probe) -> AdapterResult<Vec<SnapshotElement>> {
        let matcher = Matcher::compile(probe)?;
        let frame = self.current_frame()?;
        Ok((0..frame.len())
            .map(SnapshotElement)
            .filter(|handle| {
                frame
                    .element(handle)
                    .is_ok_and(|element| frame.matches(&matcher, &element))
            })
            .collect())
    }

    async fn measure_extent(&self) -> AdapterResult<PageMetric> {
        let frame = self.current_frame()?;
        Ok(PageMetric(frame.len() as i64))
    }

    async fn scroll_to_extent(&self) -> AdapterResult<()> {
        let last = self.frames.len() - 1;
        let next = (self.frame() + 1).min(last);
        self.current.store(next, Ordering::SeqCst);
        Ok(())
    }

    async fn text(&self, element: &SnapshotElement) -> AdapterResult<String> {
        let frame = self.current_frame()?;
        frame.element(element).map(|e| element_text(&e))
    }

    async fn attribute(
        &self,
        element: &SnapshotElement,
        name: &str,
    ) -> AdapterResult<Option<String>> {
        let frame = self.current_frame()?;
        frame
            .element(element)
            .map(|e| e.value().attr(name).map(str::to_string))
    }

    async fn find_descendant(
        &self,
        element: &SnapshotElement,
        probe: &Probe,
    ) -> AdapterResult<Option<SnapshotElement>> {
        let matcher = Matcher::compile(probe)?;
        let frame = self.current_frame()?;
        let scope = frame.element(element)?;
        Ok(scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|e| frame.matches(&matcher, e))
            .and_then(|found| frame.handle_of(&found)))
    }

    async fn parent(&self, element: &SnapshotElement) -> AdapterResult<Option<SnapshotElement>> {
        let frame = self.current_frame()?;
        let child = frame.element(element)?;
        Ok(child
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| frame.handle_of(&parent)))
    }
}
