// Profile-driven HTML parsing of listing pages
use crate::model::{ItemRecord, NOT_SPECIFIED, PLACEHOLDER_IMAGE, ParserError, UNKNOWN};
use crate::normalizer::{absolute_url, format_price, resolve_link, text_or};
use crate::parser::profile::{PriceSource, SourceProfile};
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub trait Parser {
    fn parse(&self, html: &str) -> Vec<ItemRecord>;
}

/// Extractor for one source site. Selectors are compiled once from the
/// profile, so parsing a page never fails on its own.
pub struct ListingParser {
    base_url: Url,
    card: Selector,
    title: Selector,
    link: Selector,
    image: Selector,
    brand: Option<Selector>,
    price: Selector,
    price_source: PriceSource,
    location: Option<Selector>,
    date: Option<Selector>,
}

fn compile(selector: &str) -> Result<Selector, ParserError> {
    Selector::parse(selector).map_err(|_| ParserError::InvalidSelector(selector.to_string()))
}

fn compile_opt(selector: Option<&String>) -> Result<Option<Selector>, ParserError> {
    selector.map(|s| compile(s)).transpose()
}

fn text_of(card: &ElementRef, selector: Option<&Selector>) -> Option<String> {
    let element = card.select(selector?).next()?;
    Some(element.text().collect())
}

impl ListingParser {
    pub fn new(profile: &SourceProfile) -> Result<Self, ParserError> {
        let s = &profile.selectors;
        Ok(Self {
            base_url: Url::parse(&profile.base_url)
                .map_err(|_| ParserError::InvalidBaseUrl(profile.base_url.clone()))?,
            card: compile(&s.card)?,
            title: compile(&s.title)?,
            link: compile(&s.link)?,
            image: compile(&s.image)?,
            brand: compile_opt(s.brand.as_ref())?,
            price: compile(&s.price)?,
            price_source: s.price_source.clone(),
            location: compile_opt(s.location.as_ref())?,
            date: compile_opt(s.date.as_ref())?,
        })
    }

    fn parse_card(&self, card: ElementRef) -> ItemRecord {
        let href = card
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"));

        let src = card
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"));

        let price_raw = card.select(&self.price).next().and_then(|p| match &self.price_source {
            PriceSource::Text => Some(p.text().collect::<String>()),
            PriceSource::Attribute(name) => p.value().attr(name).map(str::to_string),
        });

        ItemRecord {
            title: text_or(text_of(&card, Some(&self.title)), UNKNOWN),
            link: resolve_link(&self.base_url, href),
            image_url: absolute_url(&self.base_url, src)
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            brand: text_or(text_of(&card, self.brand.as_ref()), UNKNOWN),
            price: format_price(price_raw),
            location: text_or(text_of(&card, self.location.as_ref()), NOT_SPECIFIED),
            date: text_or(text_of(&card, self.date.as_ref()), UNKNOWN),
        }
    }
}

impl Parser for ListingParser {
    fn parse(&self, html: &str) -> Vec<ItemRecord> {
        let document = Html::parse_document(html);

        document
            .select(&self.card)
            .map(|card| self.parse_card(card))
            .collect()
    }
}
