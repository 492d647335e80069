//! Rendering boundary for faceted search results.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

use mockall::automock;

/// Independently replaceable block of rendered page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    ProductListing,
    Sidebar,
    ShowMore,
}

impl Region {
    /// Region name as used by the page templates.
    pub fn name(self) -> &'static str {
        match self {
            Self::ProductListing => "productListing",
            Self::Sidebar => "sidebar",
            Self::ShowMore => "showMore",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Signals broadcast to widgets that depend on the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The listing was replaced; comparison selections are void.
    CompareReset,
}

impl PageEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::CompareReset => "compareReset",
        }
    }
}

/// Rendered fragments returned for one search request, keyed by region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetResponseContent(BTreeMap<Region, String>);

impl FacetResponseContent {
    pub fn get(&self, region: Region) -> Option<&str> {
        self.0.get(&region).map(String::as_str)
    }

    pub fn insert(&mut self, region: Region, fragment: impl Into<String>) {
        self.0.insert(region, fragment.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Region, S)> for FacetResponseContent {
    fn from_iter<I: IntoIterator<Item = (Region, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(region, fragment)| (region, fragment.into()))
                .collect(),
        )
    }
}

/// Page surface the faceted search pipeline renders into.
#[automock]
pub trait PageRegions: Send + Sync {
    /// Replace the listing and sidebar together.
    fn replace_regions(&self, product_listing: &str, sidebar: &str);

    /// Notify listening widgets.
    fn broadcast(&self, event: PageEvent);

    /// Animate the scroll position back to the top of the page.
    fn scroll_to_top(&self, duration: Duration);

    /// Show the full option list for one facet.
    fn show_facet_options(&self, facet: &str, fragment: &str);
}
