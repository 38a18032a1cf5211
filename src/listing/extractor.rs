use crate::dom::{DomAdapter, Probe};
use crate::error::AdapterResult;
use crate::results::PartialRecord;
use crate::utils::non_blank;
use serde::{Deserialize, Serialize};

/// Headings and title-hinted elements that may carry a listing title
pub const TITLE_SELECTOR: &str = r#"h1, h2, h3, .job-title, [class*="title" i]"#;

/// One way of finding a listing title on a candidate element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TitleStrategy {
    /// The element's own visible text
    OwnText,
    /// The value of an attribute such as `aria-label`
    Attribute { name: String },
    /// Text of the first matching descendant
    Descendant { probe: Probe },
}

/// One way of finding a listing location relative to a candidate element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LocationStrategy {
    /// Text of the first matching descendant of the candidate
    Descendant { probe: Probe },
    /// Text of the first matching descendant of the candidate's parent,
    /// for locations rendered as a sibling block
    ParentDescendant { probe: Probe },
}

/// Ordered fallback chains; the first strategy with a non-blank result wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRules {
    #[serde(default = "default_title_chain")]
    pub title: Vec<TitleStrategy>,

    #[serde(default = "default_location_chain")]
    pub location: Vec<LocationStrategy>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            title: default_title_chain(),
            location: default_location_chain(),
        }
    }
}

fn default_title_chain() -> Vec<TitleStrategy> {
    vec![
        TitleStrategy::OwnText,
        TitleStrategy::Attribute {
            name: "aria-label".to_string(),
        },
        TitleStrategy::Descendant {
            probe: Probe::css(TITLE_SELECTOR),
        },
    ]
}

fn default_location_chain() -> Vec<LocationStrategy> {
    vec![
        LocationStrategy::Descendant {
            probe: Probe::LocationHint,
        },
        LocationStrategy::ParentDescendant {
            probe: Probe::LocationHint,
        },
    ]
}

async fn descendant_text<A: DomAdapter>(
    adapter: &A,
    scope: &A::Element,
    probe: &Probe,
) -> AdapterResult<Option<String>> {
    match adapter.find_descendant(scope, probe).await? {
        Some(found) => adapter.text(&found).await.map(Some),
        None => Ok(None),
    }
}

impl TitleStrategy {
    async fn resolve<A: DomAdapter>(
        &self,
        adapter: &A,
        candidate: &A::Element,
    ) -> AdapterResult<Option<String>> {
        match self {
            TitleStrategy::OwnText => adapter.text(candidate).await.map(Some),
            TitleStrategy::Attribute { name } => adapter.attribute(candidate, name).await,
            TitleStrategy::Descendant { probe } => descendant_text(adapter, candidate, probe).await,
        }
    }
}

impl LocationStrategy {
    async fn resolve<A: DomAdapter>(
        &self,
        adapter: &A,
        candidate: &A::Element,
    ) -> AdapterResult<Option<String>> {
        match self {
            LocationStrategy::Descendant { probe } => {
                descendant_text(adapter, candidate, probe).await
            }
            LocationStrategy::ParentDescendant { probe } => match adapter.parent(candidate).await? {
                Some(parent) => descendant_text(adapter, &parent, probe).await,
                None => Ok(None),
            },
        }
    }
}

/// Run the title chain; an adapter error only rules out the failing strategy
pub async fn resolve_title<A: DomAdapter>(
    adapter: &A,
    candidate: &A::Element,
    chain: &[TitleStrategy],
) -> Option<String> {
    for strategy in chain {
        match strategy.resolve(adapter, candidate).await {
            Ok(value) => {
                if let Some(title) = non_blank(value) {
                    return Some(title);
                }
            }
            Err(e) => ::log::debug!("Title strategy {:?} failed: {}", strategy, e),
        }
    }
    None
}

/// Run the location chain; an adapter error only rules out the failing strategy
pub async fn resolve_location<A: DomAdapter>(
    adapter: &A,
    candidate: &A::Element,
    chain: &[LocationStrategy],
) -> Option<String> {
    for strategy in chain {
        match strategy.resolve(adapter, candidate).await {
            Ok(value) => {
                if let Some(location) = non_blank(value) {
                    return Some(location);
                }
            }
            Err(e) => ::log::debug!("Location strategy {:?} failed: {}", strategy, e),
        }
    }
    None
}

/// Read the candidate's trimmed href; `None` when it has no usable link
pub async fn read_href<A: DomAdapter>(adapter: &A, candidate: &A::Element) -> Option<String> {
    match adapter.href(candidate).await {
        Ok(href) => non_blank(href),
        Err(e) => {
            ::log::debug!("Could not read href: {}", e);
            None
        }
    }
}

/// Extract a partial record from one candidate.
///
/// Returns `None` only when the candidate has no usable href. Missing titles
/// and locations never fail the record.
pub async fn extract<A: DomAdapter>(
    adapter: &A,
    candidate: &A::Element,
    rules: &ExtractionRules,
) -> Option<PartialRecord> {
    let href = read_href(adapter, candidate).await?;
    Some(extract_fields(adapter, candidate, href, rules).await)
}

/// Resolve title and location for a candidate whose href is already known
pub async fn extract_fields<A: DomAdapter>(
    adapter: &A,
    candidate: &A::Element,
    href: String,
    rules: &ExtractionRules,
) -> PartialRecord {
    PartialRecord {
        title: resolve_title(adapter, candidate, &rules.title).await,
        location: resolve_location(adapter, candidate, &rules.location).await,
        href,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::SnapshotDom;
    use crate::testing::FlakyDom;

    async fn first_anchor<A: DomAdapter>(dom: &A) -> A::Element {
        dom.query(&Probe::css("a")).await.unwrap().remove(0)
    }

    async fn extract_first(html: &str) -> Option<PartialRecord> {
        let dom = SnapshotDom::new(html);
        let anchor = first_anchor(&dom).await;
        extract(&dom, &anchor, &ExtractionRules::default()).await
    }

    #[tokio::test]
    async fn test_title_from_own_text() {
        let record = extract_first(r#"<a href="/jobs/1">  Backend Engineer </a>"#)
            .await
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(record.href, "/jobs/1");
    }

    #[tokio::test]
    async fn test_title_from_aria_label() {
        let record = extract_first(r#"<a href="/jobs/1" aria-label=" QA Lead "><img src="x.png"></a>"#)
            .await
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("QA Lead"));
    }

    #[tokio::test]
    async fn test_title_from_heading_descendant() {
        let dom = SnapshotDom::new(
            r#"<a href="/jobs/1"><h2>Designer</h2><span>Full time</span></a>"#,
        );
        let anchor = first_anchor(&dom).await;
        let chain = vec![TitleStrategy::Descendant {
            probe: Probe::css(TITLE_SELECTOR),
        }];
        let title = resolve_title(&dom, &anchor, &chain).await;
        assert_eq!(title.as_deref(), Some("Designer"));
    }

    #[tokio::test]
    async fn test_failing_text_yields_no_title() {
        let dom = FlakyDom::new(r#"<a href="/jobs/1"><h2>Designer</h2></a>"#).failing_text();
        let anchor = first_anchor(&dom).await;
        let record = extract(&dom, &anchor, &ExtractionRules::default())
            .await
            .unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.href, "/jobs/1");
    }

    #[tokio::test]
    async fn test_title_hint_is_case_insensitive() {
        let dom = SnapshotDom::new(
            r#"<a href="/jobs/1"><div class="PostingTitle">Writer</div></a>"#,
        );
        let anchor = first_anchor(&dom).await;
        let chain = vec![TitleStrategy::Descendant {
            probe: Probe::css(TITLE_SELECTOR),
        }];
        assert_eq!(
            resolve_title(&dom, &anchor, &chain).await.as_deref(),
            Some("Writer")
        );
    }

    #[tokio::test]
    async fn test_failing_aria_label_falls_through_to_descendant() {
        let dom = FlakyDom::new(r#"<a href="/jobs/1"><h3> </h3><p class="title">Ops</p></a>"#)
            .failing_attribute("aria-label");
        let anchor = first_anchor(&dom).await;
        let chain = vec![
            TitleStrategy::Attribute {
                name: "aria-label".to_string(),
            },
            TitleStrategy::Descendant {
                probe: Probe::css(".title"),
            },
        ];
        assert_eq!(
            resolve_title(&dom, &anchor, &chain).await.as_deref(),
            Some("Ops")
        );
    }

    #[tokio::test]
    async fn test_location_nested_in_candidate() {
        let record = extract_first(
            r#"<a href="/jobs/1"><h3>Engineer</h3><span class="location">Oslo</span></a>"#,
        )
        .await
        .unwrap();
        assert_eq!(record.location.as_deref(), Some("Oslo"));
    }

    #[tokio::test]
    async fn test_location_in_sibling_block() {
        let record = extract_first(
            r#"<div class="card">
                 <a href="/jobs/1">Engineer</a>
                 <div class="meta"><span class="job-location">Lisbon, PT</span></div>
               </div>"#,
        )
        .await
        .unwrap();
        assert_eq!(record.title.as_deref(), Some("Engineer"));
        assert_eq!(record.location.as_deref(), Some("Lisbon, PT"));
    }

    #[tokio::test]
    async fn test_location_found_by_text() {
        let record = extract_first(
            r#"<li><a href="/jobs/1">Engineer</a><p>LOCATION: Austin</p></li>"#,
        )
        .await
        .unwrap();
        assert_eq!(record.location.as_deref(), Some("LOCATION: Austin"));
    }

    #[tokio::test]
    async fn test_parent_failure_keeps_record() {
        let dom = FlakyDom::new(r#"<li><a href="/jobs/1">Engineer</a><p class="location">Kyiv</p></li>"#)
            .failing_parent();
        let anchor = first_anchor(&dom).await;
        let record = extract(&dom, &anchor, &ExtractionRules::default())
            .await
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("Engineer"));
        assert_eq!(record.location, None);
    }

    #[tokio::test]
    async fn test_descendant_failure_does_not_abort_chain() {
        let dom = FlakyDom::new(r#"<a href="/jobs/1">Engineer</a>"#).failing_descendants();
        let anchor = first_anchor(&dom).await;
        let record = extract(&dom, &anchor, &ExtractionRules::default())
            .await
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("Engineer"));
        assert_eq!(record.location, None);
    }

    #[tokio::test]
    async fn test_empty_safe_extraction() {
        let record = extract_first(r#"<html><body><a href="/jobs/9"></a></body></html>"#)
            .await
            .unwrap();
        assert_eq!(record, PartialRecord::new("/jobs/9"));
    }

    #[tokio::test]
    async fn test_missing_or_blank_href_is_discarded() {
        assert_eq!(extract_first(r#"<a class="job">No link</a>"#).await, None);
        assert_eq!(extract_first(r#"<a href="   ">Blank</a>"#).await, None);
    }

    #[tokio::test]
    async fn test_href_read_failure_is_discarded() {
        let dom = FlakyDom::new(r#"<a href="/jobs/1">Engineer</a>"#).failing_attribute("href");
        let anchor = first_anchor(&dom).await;
        assert_eq!(extract(&dom, &anchor, &ExtractionRules::default()).await, None);
    }

    #[tokio::test]
    async fn test_href_is_trimmed() {
        let record = extract_first(r#"<a href="  /jobs/3 ">X</a>"#).await.unwrap();
        assert_eq!(record.href, "/jobs/3");
    }

    #[test]
    fn test_rules_from_json() {
        let rules: ExtractionRules = serde_json::from_str(
            r#"{
                "title": [
                    { "strategy": "attribute", "name": "data-title" },
                    { "strategy": "own_text" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(rules.title.len(), 2);
        assert_eq!(
            rules.title[0],
            TitleStrategy::Attribute {
                name: "data-title".to_string()
            }
        );
        assert_eq!(rules.location, ExtractionRules::default().location);
    }
}
