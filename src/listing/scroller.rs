use crate::config::SettleConfig;
use crate::dom::{DomAdapter, PageMetric};
use crate::results::SettleResult;

/// Scroll until the page extent stops changing or the cycle budget runs out.
///
/// A reading equal to the baseline extends the streak; any other reading,
/// shrink included, resets it and becomes the new baseline. A failed scroll
/// or measurement leaves the streak untouched. Running out of cycles is not
/// an error: the caller collects whatever has loaded.
///
/// Every call takes a fresh baseline, so calling again on a page that has
/// already settled converges after `stability_threshold` cycles. That is
/// cycle 1 only when the threshold is 1, not with the default of 2.
pub async fn settle<A: DomAdapter>(adapter: &A, config: &SettleConfig) -> SettleResult {
    let threshold = config.stability_threshold.max(1);
    let delay = config.cycle_delay();

    if config.max_cycles == 0 {
        return SettleResult {
            converged: false,
            cycles_used: 0,
        };
    }

    let mut baseline: Option<PageMetric> = match adapter.measure_extent().await {
        Ok(metric) => Some(metric),
        Err(e) => {
            ::log::warn!("Initial extent measurement failed: {}", e);
            None
        }
    };
    let mut streak = 0;

    for cycle in 1..=config.max_cycles {
        let scrolled = adapter.scroll_to_extent().await;
        tokio::time::sleep(delay).await;

        if let Err(e) = scrolled {
            ::log::warn!("Scroll failed on cycle {}: {}", cycle, e);
            continue;
        }

        let current = match adapter.measure_extent().await {
            Ok(metric) => metric,
            Err(e) => {
                ::log::warn!("Extent measurement failed on cycle {}: {}", cycle, e);
                continue;
            }
        };

        if baseline == Some(current) {
            streak += 1;
            ::log::debug!(
                "Cycle {}: extent {} unchanged ({}/{})",
                cycle,
                current.0,
                streak,
                threshold
            );
            if streak >= threshold {
                ::log::info!("Page settled after {} cycles", cycle);
                return SettleResult {
                    converged: true,
                    cycles_used: cycle,
                };
            }
        } else {
            ::log::debug!("Cycle {}: extent changed to {}", cycle, current.0);
            streak = 0;
            baseline = Some(current);
        }
    }

    ::log::info!(
        "Page still growing after {} cycles, continuing with loaded content",
        config.max_cycles
    );
    SettleResult {
        converged: false,
        cycles_used: config.max_cycles,
    }
}
