//! In-memory portal: XPath -> element table with scripted behavior.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use calldl_core::config::{CallDlConfig, PollConfig};
use calldl_core::locator::{Field, Locators};
use calldl_core::page::{Element, Page, PageError};

type ClickHook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ElementState {
    text: String,
    attrs: HashMap<String, String>,
    typed: Mutex<Vec<String>>,
    clears: AtomicUsize,
    clicks: AtomicUsize,
    on_click: Option<ClickHook>,
}

#[derive(Clone, Default)]
pub struct FakeElement(Arc<ElementState>);

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeElement")
            .field("text", &self.0.text)
            .field("attrs", &self.0.attrs)
            .field("clicks", &self.clicks())
            .finish()
    }
}

impl FakeElement {
    pub fn builder() -> FakeElementBuilder {
        FakeElementBuilder(ElementState::default())
    }

    pub fn clicks(&self) -> usize {
        self.0.clicks.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.0.clears.load(Ordering::SeqCst)
    }

    pub fn typed(&self) -> Vec<String> {
        self.0.typed.lock().unwrap().clone()
    }
}

pub struct FakeElementBuilder(ElementState);

impl FakeElementBuilder {
    pub fn text(mut self, text: &str) -> Self {
        self.0.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.0.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn on_click(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.0.on_click = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> FakeElement {
        FakeElement(Arc::new(self.0))
    }
}

impl Element for FakeElement {
    async fn text(&self) -> Result<String, PageError> {
        Ok(self.0.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.0.attrs.get(name).cloned())
    }

    async fn clear(&self) -> Result<(), PageError> {
        self.0.clears.fetch_add(1, Ordering::SeqCst);
        self.0.typed.lock().unwrap().clear();
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), PageError> {
        self.0.typed.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn click(&self) -> Result<(), PageError> {
        self.0.clicks.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.0.on_click {
            hook();
        }
        Ok(())
    }
}

#[derive(Default)]
struct PortalState {
    elements: Mutex<HashMap<String, (FakeElement, usize)>>,
    lookups: Mutex<HashMap<String, usize>>,
    visited: Mutex<Vec<String>>,
    closed: AtomicBool,
}

/// Shared handle; clone one into the session and keep one for assertions.
#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<PortalState>,
    locators: Locators,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xpath(&self, field: Field) -> String {
        self.locators.xpath(field)
    }

    /// Element visible from the first lookup.
    pub fn put(&self, field: Field, element: FakeElement) -> FakeElement {
        self.put_after(field, element, 0)
    }

    /// Element that only renders after `misses` failed lookups.
    pub fn put_after(&self, field: Field, element: FakeElement, misses: usize) -> FakeElement {
        self.state
            .elements
            .lock()
            .unwrap()
            .insert(self.xpath(field), (element.clone(), misses));
        element
    }

    pub fn lookups(&self, field: Field) -> usize {
        self.state
            .lookups
            .lock()
            .unwrap()
            .get(&self.xpath(field))
            .copied()
            .unwrap_or(0)
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.visited.lock().unwrap().clone()
    }

    pub fn closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Login form and saved-search controls, all present.
    pub fn with_search_controls(self) -> Self {
        for field in [
            Field::UsernameField,
            Field::PasswordField,
            Field::LoginSubmit,
            Field::SavedSearchesMenu,
            Field::SavedQuery,
            Field::SearchStartDate,
            Field::ExecuteSearch,
        ] {
            self.put(field, FakeElement::builder().build());
        }
        self
    }

    pub fn element(&self, field: Field) -> FakeElement {
        self.state.elements.lock().unwrap()[&self.xpath(field)].0.clone()
    }
}

impl Page for FakePage {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.state.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn try_find(&self, xpath: &str) -> Result<Option<FakeElement>, PageError> {
        let seen = {
            let mut lookups = self.state.lookups.lock().unwrap();
            let n = lookups.entry(xpath.to_string()).or_insert(0);
            *n += 1;
            *n
        };
        let elements = self.state.elements.lock().unwrap();
        Ok(match elements.get(xpath) {
            Some((el, misses)) if seen > *misses => Some(el.clone()),
            _ => None,
        })
    }

    async fn close(self) -> Result<(), PageError> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Config over temp dirs with a fast cadence and a hard deadline so a broken
/// test fails instead of hanging.
pub fn test_config(download_dir: &Path, dest_dir: &Path) -> CallDlConfig {
    CallDlConfig {
        download_dir: download_dir.to_path_buf(),
        dest_dir: dest_dir.to_path_buf(),
        portal_url: "https://portal.test/login".to_string(),
        poll: Some(PollConfig {
            interval_ms: 5,
            max_interval_ms: 5,
            soft_timeout_secs: 1,
            hard_timeout_secs: Some(5),
        }),
        ..CallDlConfig::default()
    }
}

/// Click hook that behaves like Firefox saving `name`: placeholder and
/// `.part` appear, data lands, `.part` goes away.
pub fn browser_download(dir: PathBuf, name: &'static str, body: &'static [u8]) -> impl Fn() + Send + Sync {
    move || {
        let dir = dir.clone();
        std::thread::spawn(move || {
            let part = dir.join(format!("{name}.part"));
            std::thread::sleep(Duration::from_millis(20));
            std::fs::write(&part, b"").unwrap();
            std::fs::write(dir.join(name), b"").unwrap();
            std::thread::sleep(Duration::from_millis(40));
            std::fs::write(dir.join(name), body).unwrap();
            std::fs::remove_file(&part).unwrap();
        });
    }
}
