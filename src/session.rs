//! A [`Page`] bound to the [`Host`] it runs against.

use crate::config::PageConfig;
use crate::error::PageError;
use crate::events::PageEvent;
use crate::host::Host;
use crate::page::Page;

pub struct Session<H: Host> {
    page: Page,
    host: H,
}

impl<H: Host> Session<H> {
    #[must_use]
    pub fn new(config: PageConfig, host: H) -> Self {
        Self { page: Page::new(config), host }
    }

    /// Run page setup against the host.
    ///
    /// # Errors
    ///
    /// See [`Page::mount`].
    pub fn mount(&mut self) -> Result<(), PageError> {
        self.page.mount(&mut self.host)
    }

    /// # Errors
    ///
    /// See [`Page::dispatch`].
    pub fn dispatch(&mut self, event: PageEvent) -> Result<(), PageError> {
        self.page.dispatch(&mut self.host, event)
    }

    /// Dispatch events in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`Page::dispatch`].
    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = PageEvent>) -> Result<(), PageError> {
        for event in events {
            self.dispatch(event)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
