//! Faceted search request configuration.

use serde::Serialize;

use crate::search::regions::Region;

/// Default number of products per category page.
pub const DEFAULT_PRODUCTS_PER_PAGE: u32 = 12;

/// Request configuration built once when the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetRequestConfig {
    /// Sent to the storefront in the `stencil-config` header.
    pub config: StencilConfig,

    /// Templates rendered for the replaceable regions.
    pub template: RegionTemplates,

    /// Template for the "show more" facet options list.
    pub show_more: String,
}

impl FacetRequestConfig {
    /// Category page defaults.
    #[must_use]
    pub fn category(products_per_page: u32) -> Self {
        Self {
            config: StencilConfig {
                category: CategoryConfig {
                    shop_by_price: true,
                    products: ProductsConfig {
                        limit: products_per_page,
                    },
                },
            },
            template: RegionTemplates {
                product_listing: "category/product-listing".to_string(),
                sidebar: "category/sidebar".to_string(),
            },
            show_more: "category/show-more".to_string(),
        }
    }

    /// Template identifier for `region`.
    pub fn template_for(&self, region: Region) -> &str {
        match region {
            Region::ProductListing => &self.template.product_listing,
            Region::Sidebar => &self.template.sidebar,
            Region::ShowMore => &self.show_more,
        }
    }
}

impl Default for FacetRequestConfig {
    fn default() -> Self {
        Self::category(DEFAULT_PRODUCTS_PER_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StencilConfig {
    pub category: CategoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryConfig {
    pub shop_by_price: bool,
    pub products: ProductsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductsConfig {
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTemplates {
    pub product_listing: String,
    pub sidebar: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn category_config_serializes_for_stencil() -> TestResult {
        let config = FacetRequestConfig::category(24);

        assert_eq!(
            serde_json::to_value(&config.config)?,
            json!({ "category": { "shop_by_price": true, "products": { "limit": 24 } } })
        );

        Ok(())
    }

    #[test]
    fn templates_resolve_per_region() {
        let config = FacetRequestConfig::default();

        assert_eq!(
            config.template_for(Region::ProductListing),
            "category/product-listing"
        );
        assert_eq!(config.template_for(Region::Sidebar), "category/sidebar");
        assert_eq!(config.template_for(Region::ShowMore), "category/show-more");
    }
}
