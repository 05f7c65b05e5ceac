//! Seam between the session logic and the driven browser.
//!
//! The session only needs XPath lookups and a handful of element actions, so
//! the browser sits behind [`Page`] / [`Element`]. [`webdriver`] is the real
//! implementation; tests drive the session with an in-memory page.

pub mod webdriver;

pub use webdriver::{BrowserOptions, PrefValue, WebDriverPage};

/// Error from the driven browser.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("webdriver: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
}

/// A located node in the rendered document.
#[allow(async_fn_in_trait)]
pub trait Element {
    /// Rendered text content.
    async fn text(&self) -> Result<String, PageError>;
    /// Attribute value; `None` when the attribute is absent.
    async fn attr(&self, name: &str) -> Result<Option<String>, PageError>;
    async fn clear(&self) -> Result<(), PageError>;
    async fn send_keys(&self, text: &str) -> Result<(), PageError>;
    async fn click(&self) -> Result<(), PageError>;
}

/// A live document in the driven browser.
#[allow(async_fn_in_trait)]
pub trait Page {
    type Element: Element;

    async fn goto(&self, url: &str) -> Result<(), PageError>;

    /// One lookup attempt. `Ok(None)` when nothing matches `xpath`.
    async fn try_find(&self, xpath: &str) -> Result<Option<Self::Element>, PageError>;

    /// End the browser session.
    async fn close(self) -> Result<(), PageError>
    where
        Self: Sized;
}
