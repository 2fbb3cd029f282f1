//! In-memory `BrowsingSession` for tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{BrowserError, BrowsingSession, Content, ContextHandle, ElementHandle, Locator};

const LISTING: ContextHandle = ContextHandle::new(1);

/// One element on a fake page.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    markup: String,
    attributes: HashMap<String, String>,
    children: Vec<(Locator, FakeElement)>,
}

impl FakeElement {
    /// An element whose text and markup are both `text`.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            markup: text.clone(),
            text,
            ..Self::default()
        }
    }

    /// An element with markup only.
    pub fn markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, locator: Locator, child: FakeElement) -> Self {
        self.children.push((locator, child));
        self
    }
}

/// A fake page: locators mapped to the elements they match.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: HashMap<Locator, Vec<FakeElement>>,
    failing_reads: bool,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `element` as another match of `locator`.
    #[must_use]
    pub fn with(mut self, locator: Locator, element: FakeElement) -> Self {
        self.elements.entry(locator).or_default().push(element);
        self
    }

    /// Remove every match of `locator`.
    #[must_use]
    pub fn without(mut self, locator: &Locator) -> Self {
        self.elements.remove(locator);
        self
    }

    /// Reads and clicks on this page fail with a backend error, while waits
    /// still succeed.
    #[must_use]
    pub fn failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    fn matches(&self, locator: &Locator) -> &[FakeElement] {
        self.elements
            .get(locator)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn check_readable(&self) -> Result<(), BrowserError> {
        if self.failing_reads {
            Err(BrowserError::Backend("page crashed".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Records navigation and context usage so tests can assert on them.
#[derive(Debug)]
pub struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    contexts: Vec<(ContextHandle, Option<String>)>,
    active: ContextHandle,
    next_id: u64,
    navigations: Vec<String>,
    opened: Vec<String>,
    clicks: usize,
    max_open: usize,
    failing_open: bool,
    failing_detail_focus: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        let listing = LISTING;
        Self {
            pages: HashMap::new(),
            contexts: vec![(listing, None)],
            active: listing,
            next_id: 2,
            navigations: Vec::new(),
            opened: Vec::new(),
            clicks: 0,
            max_open: 1,
            failing_open: false,
            failing_detail_focus: false,
        }
    }

    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, page: FakePage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    /// `open_context` fails without opening anything.
    #[must_use]
    pub fn failing_open(mut self) -> Self {
        self.failing_open = true;
        self
    }

    /// Focusing any context other than the listing context fails.
    #[must_use]
    pub fn failing_detail_focus(mut self) -> Self {
        self.failing_detail_focus = true;
        self
    }

    /// URLs navigated to in the listing context, in order.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// URLs opened in new contexts, in order.
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    /// Most contexts that were ever open at once.
    pub fn max_open_contexts(&self) -> usize {
        self.max_open
    }

    fn url_of(&self, context: ContextHandle) -> Result<Option<&str>, BrowserError> {
        self.contexts
            .iter()
            .find(|(handle, _)| *handle == context)
            .map(|(_, url)| url.as_deref())
            .ok_or(BrowserError::UnknownContext(context.id()))
    }

    fn page_of(&self, context: ContextHandle) -> Result<Option<&FakePage>, BrowserError> {
        Ok(self.url_of(context)?.and_then(|url| self.pages.get(url)))
    }

    fn active_page(&self) -> Result<Option<&FakePage>, BrowserError> {
        self.page_of(self.active)
    }
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowsingSession for FakeBrowser {
    fn active(&self) -> ContextHandle {
        self.active
    }

    fn open_contexts(&self) -> usize {
        self.contexts.len()
    }

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let active = self.active;
        let slot = self
            .contexts
            .iter_mut()
            .find(|(handle, _)| *handle == active)
            .ok_or(BrowserError::UnknownContext(active.id()))?;
        slot.1 = Some(url.to_string());
        self.navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_for_any(
        &mut self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<Locator, BrowserError> {
        let page = self.active_page()?;
        locators
            .iter()
            .find(|l| page.is_some_and(|p| !p.matches(l).is_empty()))
            .cloned()
            .ok_or_else(|| BrowserError::Timeout {
                what: locators
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" | "),
                after: timeout,
            })
    }

    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let count = self.active_page()?.map_or(0, |p| p.matches(locator).len());
        Ok((0..count)
            .map(|i| ElementHandle::new(self.active, locator.clone(), i))
            .collect())
    }

    async fn read(
        &mut self,
        locator: &Locator,
        content: Content,
    ) -> Result<Option<String>, BrowserError> {
        let Some(page) = self.active_page()? else {
            return Ok(None);
        };
        page.check_readable()?;
        Ok(page.matches(locator).first().map(|e| match content {
            Content::Text => e.text.trim().to_string(),
            Content::Markup => e.markup.clone(),
        }))
    }

    async fn child_attribute(
        &mut self,
        element: &ElementHandle,
        child: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let parent = self
            .page_of(element.context())?
            .and_then(|p| p.matches(element.locator()).get(element.index()))
            .ok_or_else(|| BrowserError::StaleElement(element.locator().to_string()))?;
        Ok(parent
            .children
            .iter()
            .find(|(locator, _)| locator == child)
            .and_then(|(_, node)| node.attributes.get(name).cloned()))
    }

    async fn click(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        let Some(page) = self.active_page()? else {
            return Ok(false);
        };
        page.check_readable()?;
        if page.matches(locator).is_empty() {
            return Ok(false);
        }
        self.clicks += 1;
        Ok(true)
    }

    async fn open_context(&mut self, url: &str) -> Result<ContextHandle, BrowserError> {
        if self.failing_open {
            return Err(BrowserError::Backend("new tab refused".to_string()));
        }
        let handle = ContextHandle::new(self.next_id);
        self.next_id += 1;
        self.contexts.push((handle, Some(url.to_string())));
        self.opened.push(url.to_string());
        self.max_open = self.max_open.max(self.contexts.len());
        Ok(handle)
    }

    async fn close_context(&mut self, context: ContextHandle) -> Result<(), BrowserError> {
        let position = self
            .contexts
            .iter()
            .position(|(handle, _)| *handle == context)
            .ok_or(BrowserError::UnknownContext(context.id()))?;
        self.contexts.remove(position);
        Ok(())
    }

    async fn focus(&mut self, context: ContextHandle) -> Result<(), BrowserError> {
        self.url_of(context)?;
        if self.failing_detail_focus && context != LISTING {
            return Err(BrowserError::Backend("tab not activated".to_string()));
        }
        self.active = context;
        Ok(())
    }
}
