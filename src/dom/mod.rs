pub mod adapter;
pub mod snapshot;
pub mod webdriver;

pub use adapter::{DomAdapter, LOCATION_HINT, PageMetric, Probe};
pub use snapshot::{SnapshotDom, SnapshotElement};
pub use webdriver::WebDriverSession;
