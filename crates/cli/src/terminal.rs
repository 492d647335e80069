//! Terminal rendering boundary.
//!
//! Stands in for the browser page: fragments are written to the output,
//! page effects without a terminal equivalent are logged.

use std::{
    io::{self, Stdout, Write},
    sync::Mutex,
    time::Duration,
};

use storefront_app::{
    carts::CartView,
    search::{PageEvent, PageRegions, Region},
};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub(crate) struct TerminalPage<W> {
    out: Mutex<W>,
}

impl TerminalPage<Stdout> {
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalPage<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn write_section(&self, title: &str, body: &str) {
        let Ok(mut out) = self.out.lock() else {
            warn!("terminal output lock poisoned, dropping {title}");

            return;
        };

        if let Err(error) = writeln!(out, "== {title} ==\n{body}") {
            warn!("failed to write {title}: {error}");
        }
    }
}

impl<W: Write + Send> CartView for TerminalPage<W> {
    fn navigate(&self, path: &str) {
        info!("navigate to {path}");

        self.write_section("navigate", path);
    }

    fn notify_success(&self, message: &str) {
        info!("notification: {message}");

        self.write_section("notification", message);
    }

    fn set_remove_all_visible(&self, visible: bool) {
        info!("remove all visible: {visible}");
    }
}

impl<W: Write + Send> PageRegions for TerminalPage<W> {
    fn replace_regions(&self, product_listing: &str, sidebar: &str) {
        debug!("replacing listing and sidebar");

        self.write_section(Region::ProductListing.name(), product_listing);
        self.write_section(Region::Sidebar.name(), sidebar);
    }

    fn broadcast(&self, event: PageEvent) {
        debug!("broadcast {}", event.name());
    }

    fn scroll_to_top(&self, duration: Duration) {
        debug!("scroll to top over {}ms", duration.as_millis());
    }

    fn show_facet_options(&self, facet: &str, fragment: &str) {
        self.write_section(&format!("{} {facet}", Region::ShowMore.name()), fragment);
    }
}

#[cfg(test)]
impl TerminalPage<Vec<u8>> {
    fn written(&self) -> String {
        self.out
            .lock()
            .map(|out| String::from_utf8_lossy(&out).into_owned())
            .unwrap_or_default()
    }
}
