// Source profiles: base URL, search URL template and selectors per site
use crate::model::ScrapeRequest;

/// Where a card's price amount is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// Text content of the price element.
    Text,
    /// Value of the named attribute on the price element.
    Attribute(String),
}

/// CSS selectors for one site. Fields without a selector always resolve to
/// their fallback value.
#[derive(Debug, Clone)]
pub struct FieldSelectors {
    pub card: String,
    pub title: String,
    pub link: String,
    pub image: String,
    pub brand: Option<String>,
    pub price: String,
    pub price_source: PriceSource,
    pub location: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SourceProfile {
    /// Short tag used in routes and cache keys, e.g. `drom`.
    pub id: String,
    pub base_url: String,
    /// Search page template; `{base}`, `{search}`, `{model}` and `{page}` are substituted.
    pub search_template: String,
    pub selectors: FieldSelectors,
}

impl SourceProfile {
    pub fn drom() -> Self {
        Self {
            id: "drom".into(),
            base_url: "https://baza.drom.ru".into(),
            search_template: "{base}/sell_spare_parts/+/{search}/{model}/?page={page}".into(),
            selectors: FieldSelectors {
                card: ".bull-item__content-wrapper".into(),
                title: ".bull-item__subject-container a.bulletinLink".into(),
                link: ".bull-item__subject-container a.bulletinLink".into(),
                image: ".bull-image-container img".into(),
                brand: Some(".bull-item__annotation-row.manufacturer".into()),
                price: ".price-block__price".into(),
                price_source: PriceSource::Attribute("data-price".into()),
                location: Some(".bull-delivery__city".into()),
                date: Some(".date".into()),
            },
        }
    }

    pub fn exist() -> Self {
        Self {
            id: "exist".into(),
            base_url: "https://exist.ru".into(),
            search_template: "{base}/Catalog/TO/?q={search}+{model}&page={page}".into(),
            selectors: FieldSelectors {
                card: ".catalog-item-class".into(),
                title: ".item-title-class".into(),
                link: "a".into(),
                image: "img".into(),
                brand: None,
                price: ".price-class".into(),
                price_source: PriceSource::Text,
                location: None,
                date: None,
            },
        }
    }

    pub fn autodoc() -> Self {
        Self {
            id: "autodoc".into(),
            base_url: "https://www.autodoc.ru".into(),
            search_template: "{base}/search?query={search}+{model}&page={page}".into(),
            selectors: FieldSelectors {
                card: ".product-card-class".into(),
                title: ".product-title-class".into(),
                link: "a".into(),
                image: "img".into(),
                brand: None,
                price: ".price-class".into(),
                price_source: PriceSource::Text,
                location: None,
                date: None,
            },
        }
    }

    pub fn amry() -> Self {
        Self {
            id: "amry".into(),
            base_url: "https://www.amry.ru".into(),
            search_template: "{base}/search?query={search}+{model}&page={page}".into(),
            selectors: FieldSelectors {
                card: ".item-card-class".into(),
                title: ".title-class".into(),
                link: "a".into(),
                image: "img".into(),
                brand: None,
                price: ".price-class".into(),
                price_source: PriceSource::Text,
                location: None,
                date: None,
            },
        }
    }

    /// Every profile the service ships with.
    pub fn builtin() -> Vec<Self> {
        vec![Self::drom(), Self::exist(), Self::autodoc(), Self::amry()]
    }

    /// Points the profile at another origin (mirrors, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search and model are percent-encoded, so they stay one path segment or
    /// query value each. Encoded values contain no braces, so later
    /// placeholders cannot be substituted inside them.
    pub fn search_url(&self, req: &ScrapeRequest) -> String {
        self.search_template
            .replace("{search}", &urlencoding::encode(&req.search))
            .replace("{model}", &urlencoding::encode(&req.model))
            .replace("{page}", &req.page.to_string())
            .replace("{base}", self.base_url.trim_end_matches('/'))
    }
}
