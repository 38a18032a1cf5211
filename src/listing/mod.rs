pub mod assembler;
pub mod collector;
pub mod extractor;
pub mod scroller;

#[cfg(test)]
mod tests;

use crate::config::HarvestConfig;
use crate::dom::DomAdapter;
use crate::results::HarvestReport;
use std::collections::HashSet;
use std::time::Duration;

pub use assembler::assemble;
pub use collector::{await_candidates, collect};
pub use extractor::{ExtractionRules, LocationStrategy, TitleStrategy, extract};
pub use scroller::settle;

/// How often the readiness wait re-queries the page
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the whole listing life cycle against one page session.
///
/// Waits for listings to start rendering, scrolls until the page settles,
/// collects candidates, extracts their fields and deduplicates them. The
/// session is only borrowed; opening and closing it is up to the caller.
pub async fn harvest<A: DomAdapter>(adapter: &A, config: &HarvestConfig) -> HarvestReport {
    await_candidates(
        adapter,
        &config.ready_patterns,
        config.ready_timeout(),
        READY_POLL_INTERVAL,
    )
    .await;

    let settled = settle(adapter, &config.settle).await;
    let candidates = collect(adapter, &config.candidate_patterns).await;

    let mut partials = Vec::with_capacity(candidates.len());
    let mut extracted = HashSet::new();
    let mut discarded = 0;

    for candidate in &candidates {
        let Some(href) = extractor::read_href(adapter, candidate).await else {
            discarded += 1;
            continue;
        };

        // Only the first occurrence can survive assembly
        if !extracted.insert(href.clone()) {
            continue;
        }

        partials.push(extractor::extract_fields(adapter, candidate, href, &config.rules).await);
    }

    let records = assemble(partials);

    ::log::info!(
        "Extracted {} listings from {} candidates ({} without a link)",
        records.len(),
        candidates.len(),
        discarded
    );

    HarvestReport {
        settle: settled,
        candidates: candidates.len(),
        discarded,
        records,
    }
}
