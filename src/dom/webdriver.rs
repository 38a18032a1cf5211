use crate::dom::adapter::{DomAdapter, PageMetric, Probe};
use crate::error::{AdapterError, AdapterResult, HarvestError};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::Value;

const EXTENT_SCRIPT: &str = "return document.body.scrollHeight";
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Case-folds only the letters of the hint word, as the XPath 1.0 idiom does
const LOCATION_XPATH: &str = r#".//*[contains(@class, "location") or contains(translate(normalize-space(.), "LOCATION", "location"), "location")]"#;

/// Local WebDriver endpoints tried when the configured one refuses
const FALLBACK_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A single WebDriver browser session
///
/// fantoccini serializes every command through the client's session task,
/// so the session can be shared by reference without extra locking.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connect to the WebDriver server, trying common local ports if the
    /// configured URL is unreachable
    pub async fn connect(webdriver_url: &str) -> Result<Self, HarvestError> {
        match ClientBuilder::native().connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(HarvestError::Session(format!(
            "no WebDriver server answered at {}",
            webdriver_url
        )))
    }

    /// Navigate the session to the page
    pub async fn goto(&self, url: &str) -> Result<(), HarvestError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| HarvestError::Navigation {
                url: url.to_string(),
                source: e.into(),
            })
    }

    /// End the browser session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

fn locator(probe: &Probe) -> Locator<'_> {
    match probe {
        Probe::Css(selector) => Locator::Css(selector),
        Probe::LocationHint => Locator::XPath(LOCATION_XPATH),
    }
}

fn metric_from(value: Value) -> AdapterResult<PageMetric> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|height| height as i64))
        .map(PageMetric)
        .ok_or_else(|| AdapterError::NonNumericMetric(value.to_string()))
}

#[async_trait]
impl DomAdapter for WebDriverSession {
    type Element = Element;

    async fn query(&self, probe: &Probe) -> AdapterResult<Vec<Element>> {
        let locator = match probe {
            // Document-wide form of the descendant expression
            Probe::LocationHint => Locator::XPath(&LOCATION_XPATH[1..]),
            _ => locator(probe),
        };
        Ok(self.client.find_all(locator).await?)
    }

    async fn measure_extent(&self) -> AdapterResult<PageMetric> {
        let value = self.client.execute(EXTENT_SCRIPT, Vec::new()).await?;
        metric_from(value)
    }

    async fn scroll_to_extent(&self) -> AdapterResult<()> {
        self.client.execute(SCROLL_SCRIPT, Vec::new()).await?;
        Ok(())
    }

    async fn text(&self, element: &Element) -> AdapterResult<String> {
        Ok(element.text().await?)
    }

    async fn attribute(&self, element: &Element, name: &str) -> AdapterResult<Option<String>> {
        Ok(element.attr(name).await?)
    }

    /// Prefers the resolved `href` property so relative links come back absolute
    async fn href(&self, element: &Element) -> AdapterResult<Option<String>> {
        match element.prop("href").await? {
            Some(href) if !href.trim().is_empty() => Ok(Some(href)),
            _ => Ok(element.attr("href").await?),
        }
    }

    async fn find_descendant(
        &self,
        element: &Element,
        probe: &Probe,
    ) -> AdapterResult<Option<Element>> {
        let found = element.find_all(locator(probe)).await?;
        Ok(found.into_iter().next())
    }

    async fn parent(&self, element: &Element) -> AdapterResult<Option<Element>> {
        let found = element.find_all(Locator::XPath("..")).await?;
        Ok(found.into_iter().next())
    }
}
