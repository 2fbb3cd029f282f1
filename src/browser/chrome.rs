use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use tokio::time::Instant;

use super::{BrowserError, BrowsingSession, Content, ContextHandle, ElementHandle, Locator};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub user_agent: String,
    pub navigation_timeout: Duration,
}

/// `BrowsingSession` backed by a local Chrome/Chromium over the DevTools
/// protocol. Each context is a tab.
pub struct ChromeSession {
    // Dropping the browser shuts the Chrome process down.
    browser: Browser,
    tabs: Vec<(ContextHandle, Arc<Tab>)>,
    active: ContextHandle,
    next_id: u64,
    options: ChromeOptions,
}

impl ChromeSession {
    /// Launch Chrome and open the tab used as the listing context.
    pub fn launch(options: ChromeOptions) -> Result<Self, BrowserError> {
        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .window_size(Some((1920, 1080)))
            .path(options.chrome_path.clone())
            .idle_browser_timeout(IDLE_TIMEOUT)
            .build()
            .map_err(|e| BrowserError::Backend(format!("Invalid launch options: {e}")))?;

        let browser = Browser::new(launch).map_err(backend)?;
        let tab = browser.new_tab().map_err(backend)?;
        configure_tab(&tab, &options)?;

        let active = ContextHandle::new(1);
        tracing::info!("Chrome launched (headless: {})", options.headless);

        Ok(Self {
            browser,
            tabs: vec![(active, tab)],
            active,
            next_id: 2,
            options,
        })
    }

    fn tab(&self, context: ContextHandle) -> Result<Arc<Tab>, BrowserError> {
        self.tabs
            .iter()
            .find(|(handle, _)| *handle == context)
            .map(|(_, tab)| Arc::clone(tab))
            .ok_or(BrowserError::UnknownContext(context.id()))
    }

    fn active_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.tab(self.active)
    }
}

#[async_trait]
impl BrowsingSession for ChromeSession {
    fn active(&self) -> ContextHandle {
        self.active
    }

    fn open_contexts(&self) -> usize {
        self.tabs.len()
    }

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let tab = self.active_tab()?;
        blocking(|| {
            tab.navigate_to(url)
                .and_then(|t| t.wait_until_navigated())
                .map(|_| ())
                .map_err(|e| BrowserError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
        })
    }

    async fn wait_for_any(
        &mut self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<Locator, BrowserError> {
        let tab = self.active_tab()?;
        let deadline = Instant::now() + timeout;
        loop {
            let matched =
                blocking(|| locators.iter().find(|l| !find_all(&tab, l).is_empty()).cloned());
            if let Some(locator) = matched {
                return Ok(locator);
            }
            if Instant::now() >= deadline {
                let what = locators
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" | ");
                return Err(BrowserError::Timeout {
                    what,
                    after: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let tab = self.active_tab()?;
        let count = blocking(|| find_all(&tab, locator).len());
        Ok((0..count)
            .map(|i| ElementHandle::new(self.active, locator.clone(), i))
            .collect())
    }

    async fn read(
        &mut self,
        locator: &Locator,
        content: Content,
    ) -> Result<Option<String>, BrowserError> {
        let tab = self.active_tab()?;
        blocking(|| {
            let Some(element) = find_all(&tab, locator).into_iter().next() else {
                return Ok(None);
            };
            let value = match content {
                Content::Text => element.get_inner_text().map(|t| t.trim().to_string()),
                Content::Markup => element.get_content(),
            };
            value.map(Some).map_err(backend)
        })
    }

    async fn child_attribute(
        &mut self,
        element: &ElementHandle,
        child: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let tab = self.tab(element.context())?;
        blocking(|| {
            let parent = find_all(&tab, element.locator())
                .into_iter()
                .nth(element.index())
                .ok_or_else(|| BrowserError::StaleElement(element.locator().to_string()))?;
            let found = match child {
                Locator::Css(s) => parent.find_element(s),
                Locator::XPath(q) => parent.find_element_by_xpath(q),
            };
            match found {
                Ok(node) => node.get_attribute_value(name).map_err(backend),
                Err(_) => Ok(None),
            }
        })
    }

    async fn click(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        let tab = self.active_tab()?;
        blocking(|| {
            let Some(element) = find_all(&tab, locator).into_iter().next() else {
                return Ok(false);
            };
            // Script click: the control is often covered by overlays.
            element
                .call_js_fn("function() { this.click(); }", vec![], false)
                .map(|_| true)
                .map_err(backend)
        })
    }

    async fn open_context(&mut self, url: &str) -> Result<ContextHandle, BrowserError> {
        let tab = blocking(|| self.browser.new_tab()).map_err(backend)?;
        let opened = configure_tab(&tab, &self.options).and_then(|()| {
            blocking(|| tab.navigate_to(url).map(|_| ())).map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
        });
        if let Err(e) = opened {
            // Never leave a half-opened tab behind.
            let _ = blocking(|| tab.close(true));
            return Err(e);
        }

        let handle = ContextHandle::new(self.next_id);
        self.next_id += 1;
        self.tabs.push((handle, tab));
        Ok(handle)
    }

    async fn close_context(&mut self, context: ContextHandle) -> Result<(), BrowserError> {
        close_tracked(&mut self.tabs, context, |tab| {
            blocking(|| tab.close(true)).map(|_| ()).map_err(backend)
        })
    }

    async fn focus(&mut self, context: ContextHandle) -> Result<(), BrowserError> {
        let tab = self.tab(context)?;
        blocking(|| tab.activate().map(|_| ())).map_err(backend)?;
        self.active = context;
        Ok(())
    }
}

/// Close the tab behind `context`. It stays tracked if the close fails.
fn close_tracked<T>(
    tabs: &mut Vec<(ContextHandle, T)>,
    context: ContextHandle,
    close: impl FnOnce(&T) -> Result<(), BrowserError>,
) -> Result<(), BrowserError> {
    let position = tabs
        .iter()
        .position(|(handle, _)| *handle == context)
        .ok_or(BrowserError::UnknownContext(context.id()))?;
    close(&tabs[position].1)?;
    tabs.remove(position);
    Ok(())
}

fn configure_tab(tab: &Tab, options: &ChromeOptions) -> Result<(), BrowserError> {
    tab.set_default_timeout(options.navigation_timeout);
    tab.set_user_agent(&options.user_agent, None, None)
        .map_err(backend)
}

/// Every match of `locator`; lookup failures count as no match.
fn find_all<'t>(tab: &'t Tab, locator: &Locator) -> Vec<Element<'t>> {
    let found = match locator {
        Locator::Css(s) => tab.find_elements(s),
        Locator::XPath(q) => tab.find_elements_by_xpath(q),
    };
    found.unwrap_or_default()
}

// headless_chrome is synchronous; keep its calls off the async workers.
fn blocking<T>(f: impl FnOnce() -> T) -> T {
    tokio::task::block_in_place(f)
}

fn backend(e: impl std::fmt::Display) -> BrowserError {
    BrowserError::Backend(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked() -> Vec<(ContextHandle, &'static str)> {
        vec![
            (ContextHandle::new(1), "listing"),
            (ContextHandle::new(2), "detail"),
        ]
    }

    #[test]
    fn test_close_tracked_forgets_closed_tab() {
        let mut tabs = tracked();
        let mut closed = Vec::new();

        close_tracked(&mut tabs, ContextHandle::new(2), |tab| {
            closed.push(*tab);
            Ok(())
        })
        .unwrap();

        assert_eq!(closed, vec!["detail"]);
        assert_eq!(tabs, vec![(ContextHandle::new(1), "listing")]);
    }

    #[test]
    fn test_close_tracked_keeps_tab_when_close_fails() {
        let mut tabs = tracked();

        let result = close_tracked(&mut tabs, ContextHandle::new(2), |_| {
            Err(BrowserError::Backend("target closed".to_string()))
        });

        assert!(matches!(result, Err(BrowserError::Backend(_))));
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn test_close_tracked_unknown_context() {
        let mut tabs = tracked();

        let result = close_tracked(&mut tabs, ContextHandle::new(9), |_| Ok(()));

        assert!(matches!(result, Err(BrowserError::UnknownContext(9))));
        assert_eq!(tabs.len(), 2);
    }
}
