
use crate::config::{HarvestConfig, SettleConfig};

/// Listing page with `count` job cards, the location in a sibling block
pub fn careers_page(count: usize) -> String {
    let cards: String = (1..=count)
        .map(|i| {
            format!(
                r#"<li class="posting">
                     <a href="/jobs/{i}" class="job-link"><h3>Role {i}</h3></a>
                     <span class="location">City {i}</span>
                   </li>"#
            )
        })
        .collect();
    format!("<html><body><h1>Careers</h1><ul>{cards}</ul></body></html>")
}

/// Default configuration with every wait removed
pub fn instant_config() -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.ready_timeout_secs = 0;
    config.settle = SettleConfig {
        cycle_delay_ms: 0,
        ..SettleConfig::default()
    };
    config
}
