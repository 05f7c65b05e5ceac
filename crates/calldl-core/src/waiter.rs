//! Element waiter: locate portal elements that render asynchronously.

use crate::error::SessionError;
use crate::locator::{Field, Locators};
use crate::page::Page;
use crate::poll::{poll_until, PollPolicy};

/// Resolves [`Field`]s against a page, either by waiting for them to render
/// or by a single lookup for elements that may legitimately be absent.
#[derive(Debug, Clone)]
pub struct ElementWaiter {
    locators: Locators,
    policy: PollPolicy,
}

impl ElementWaiter {
    pub fn new(locators: Locators, policy: PollPolicy) -> Self {
        Self { locators, policy }
    }

    /// Poll until `field` renders. Slowness only produces a warning; absence is
    /// an error only when the policy carries a hard deadline.
    pub async fn wait_for<P: Page>(&self, page: &P, field: Field) -> Result<P::Element, SessionError> {
        let xpath = self.locators.xpath(field);
        let label = format!("{} ({})", field, xpath);
        let path = xpath.as_str();
        let found = poll_until(&self.policy, &label, move || page.try_find(path)).await?;
        found.ok_or_else(|| SessionError::ElementMissing {
            field: field.to_string(),
            xpath,
        })
    }

    /// Exactly one lookup; `Ok(None)` means the element is not on the page.
    pub async fn find_optional<P: Page>(
        &self,
        page: &P,
        field: Field,
    ) -> Result<Option<P::Element>, SessionError> {
        let xpath = self.locators.xpath(field);
        let path = xpath.as_str();
        let found =
            poll_until(&PollPolicy::once(), &field.to_string(), move || page.try_find(path)).await?;
        if found.is_none() {
            tracing::debug!(%field, %xpath, "element not present");
        }
        Ok(found)
    }
}
