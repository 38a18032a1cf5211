use crate::dom::{DomAdapter, Probe};
use std::time::Duration;
use tokio::time::Instant;

/// Gather every element matching any of the patterns.
///
/// Patterns are queried in order and their matches concatenated, so an
/// element matched by several patterns appears several times. Duplicates
/// are resolved by the assembler. A pattern whose query fails contributes
/// nothing.
pub async fn collect<A: DomAdapter>(adapter: &A, patterns: &[String]) -> Vec<A::Element> {
    let mut candidates = Vec::new();

    for pattern in patterns {
        match adapter.query(&Probe::css(pattern.as_str())).await {
            Ok(found) => {
                ::log::debug!("Pattern {} matched {} elements", pattern, found.len());
                candidates.extend(found);
            }
            Err(e) => {
                ::log::warn!("Skipping pattern {}: {}", pattern, e);
            }
        }
    }

    ::log::info!(
        "Collected {} candidate elements from {} patterns",
        candidates.len(),
        patterns.len()
    );
    candidates
}

/// Poll until any of the patterns matches something or the timeout elapses.
///
/// Returns whether a match was seen. Query failures count as "nothing yet".
pub async fn await_candidates<A: DomAdapter>(
    adapter: &A,
    patterns: &[String],
    timeout: Duration,
    poll_interval: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;

    loop {
        for pattern in patterns {
            if let Ok(found) = adapter.query(&Probe::css(pattern.as_str())).await {
                if !found.is_empty() {
                    ::log::debug!("Listings rendered, matched by {}", pattern);
                    return true;
                }
            }
        }

        if Instant::now() >= deadline {
            ::log::warn!(
                "No listing elements appeared within {:.1} seconds",
                timeout.as_secs_f64()
            );
            return false;
        }
        tokio::time::sleep(poll_interval).await;
    }
}
