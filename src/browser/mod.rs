// Browsing session abstraction.
// The crawler and the detail extractor only talk to this trait, so the
// Chrome backend can be swapped for the in-memory fake in tests.

pub mod chrome;

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// A structured query into the page of the focused context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(Cow<'static, str>),
    XPath(Cow<'static, str>),
}

impl Locator {
    pub fn css(selector: impl Into<Cow<'static, str>>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(query: impl Into<Cow<'static, str>>) -> Self {
        Locator::XPath(query.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css:{s}"),
            Locator::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

/// What to read from a located element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Rendered text, trimmed.
    Text,
    /// Element markup.
    Markup,
}

/// Opaque handle to one browsing context (a tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(u64);

impl ContextHandle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Handle to the `index`-th match of `locator` inside `context`.
///
/// Handles are re-resolved on use, so they stay valid while other contexts
/// are opened and closed, as long as the owning page is not navigated away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    context: ContextHandle,
    locator: Locator,
    index: usize,
}

impl ElementHandle {
    pub fn new(context: ContextHandle, locator: Locator, index: usize) -> Self {
        Self {
            context,
            locator,
            index,
        }
    }

    pub fn context(&self) -> ContextHandle {
        self.context
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Unknown browsing context {0}")]
    UnknownContext(u64),

    #[error("Stale element handle: {0}")]
    StaleElement(String),

    #[error("Browser backend error: {0}")]
    Backend(String),
}

/// Everything the crawl needs from a browser.
///
/// All operations act on the focused context unless they take a handle.
/// Queries report a missing element as `Ok(None)`; `Err` is reserved for
/// failures of the browser itself.
#[async_trait]
pub trait BrowsingSession: Send {
    /// The currently focused context.
    fn active(&self) -> ContextHandle;

    /// Number of contexts currently open.
    fn open_contexts(&self) -> usize;

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Wait until any of `locators` matches, returning the first that did.
    async fn wait_for_any(
        &mut self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<Locator, BrowserError>;

    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError>;

    async fn read(
        &mut self,
        locator: &Locator,
        content: Content,
    ) -> Result<Option<String>, BrowserError>;

    /// Attribute `name` of the first `child` under `element`.
    async fn child_attribute(
        &mut self,
        element: &ElementHandle,
        child: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Click the first match of `locator`. Returns `false` if nothing matched.
    async fn click(&mut self, locator: &Locator) -> Result<bool, BrowserError>;

    /// Open `url` in a new context without focusing it.
    async fn open_context(&mut self, url: &str) -> Result<ContextHandle, BrowserError>;

    async fn close_context(&mut self, context: ContextHandle) -> Result<(), BrowserError>;

    async fn focus(&mut self, context: ContextHandle) -> Result<(), BrowserError>;
}
