//! Field accessors built from ordered fallback chains.
//!
//! Each field walks its chain top to bottom and stops at the first
//! non-empty value. Icon and image results are then made absolute
//! against the page URL.

use serde::Serialize;
use siteinfo_common::{FetchConfig, Result};

use crate::absolute::to_absolute;
use crate::document::{FieldQuery, ParsedDocument};
use crate::loader::{PageLoader, PageSource};

/// One place a field value may come from.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Text of the first `<title>`.
    TitleText,
    Query(FieldQuery<'static>),
}

const TITLE_CHAIN: &[Step] = &[
    Step::TitleText,
    Step::Query(FieldQuery::meta_property("og:title")),
    Step::Query(FieldQuery::meta_property("twitter:title")),
];

const DESCRIPTION_CHAIN: &[Step] = &[
    Step::Query(FieldQuery::meta_name("description")),
    Step::Query(FieldQuery::meta_property("og:description")),
    Step::Query(FieldQuery::meta_property("twitter:description")),
];

const KEYWORDS_CHAIN: &[Step] = &[Step::Query(FieldQuery::meta_name("keywords"))];

const ICON_CHAIN: &[Step] = &[
    Step::Query(FieldQuery::link_rel("shortcut icon")),
    Step::Query(FieldQuery::link_rel("icon")),
];

// Higher resolutions first; the icon is the last resort (see `image`).
const IMAGE_CHAIN: &[Step] = &[
    Step::Query(FieldQuery::meta_property("og:image")),
    Step::Query(FieldQuery::meta_name("msapplication-TileImage")),
    Step::Query(FieldQuery::link_rel("fluid-icon")),
    Step::Query(FieldQuery::meta_name("twitter:image")),
    Step::Query(FieldQuery::link_sizes("152x152")),
    Step::Query(FieldQuery::link_sizes("144x144")),
    Step::Query(FieldQuery::link_sizes("120x120")),
    Step::Query(FieldQuery::link_sizes("114x114")),
    Step::Query(FieldQuery::link_sizes("76x76")),
    Step::Query(FieldQuery::link_sizes("72x72")),
    Step::Query(FieldQuery::link_sizes("57x57")),
];

/// Every field of a page at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteInfo {
    pub url: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub icon: String,
    pub image: String,
}

/// A page and its parsed document; all accessors are read-only.
#[derive(Debug)]
pub struct MetadataExtractor {
    url: String,
    document: ParsedDocument,
}

impl MetadataExtractor {
    pub fn new(url: impl Into<String>, document: ParsedDocument) -> Self {
        Self {
            url: url.into(),
            document,
        }
    }

    /// Build from an HTML string already in hand.
    ///
    /// ```
    /// use siteinfo_web::MetadataExtractor;
    ///
    /// let page = MetadataExtractor::from_html(
    ///     "https://example.com/post",
    ///     r#"<title>Post</title><link rel="icon" href="/i.png">"#,
    /// );
    /// assert_eq!(page.title(), "Post");
    /// assert_eq!(page.icon().unwrap(), "https://example.com/i.png");
    /// ```
    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        Self::new(url, ParsedDocument::parse(html))
    }

    /// Fetch `url` through `loader` and parse it.
    pub async fn fetch<S: PageSource>(loader: &PageLoader<S>, url: &str) -> Self {
        let document = loader.load(url).await;
        Self::new(url, document)
    }

    /// Fetch `url` with a default-configured HTTP client.
    pub async fn from_url(url: &str) -> Result<Self> {
        let loader = PageLoader::new(&FetchConfig::default())?;
        Ok(Self::fetch(&loader, url).await)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &ParsedDocument {
        &self.document
    }

    pub fn title(&self) -> String {
        self.resolve("title", TITLE_CHAIN)
    }

    pub fn description(&self) -> String {
        self.resolve("description", DESCRIPTION_CHAIN)
    }

    pub fn keywords(&self) -> String {
        self.resolve("keywords", KEYWORDS_CHAIN)
    }

    /// Favicon URL, absolute.
    pub fn icon(&self) -> Result<String> {
        to_absolute(&self.resolve("icon", ICON_CHAIN), &self.url)
    }

    /// Preview image URL, absolute. Falls back to [`Self::icon`].
    pub fn image(&self) -> Result<String> {
        let img = self.resolve("image", IMAGE_CHAIN);
        if img.is_empty() {
            // already absolute
            return self.icon();
        }
        to_absolute(&img, &self.url)
    }

    /// Generic lookup: `result_attr` of the first `tag` whose `match_attr`
    /// equals `match_value`, or empty.
    pub fn tag_value(
        &self,
        tag: &str,
        match_attr: &str,
        match_value: &str,
        result_attr: &str,
    ) -> String {
        self.document
            .find_attribute(&FieldQuery::new(tag, match_attr, match_value, result_attr))
    }

    pub fn summary(&self) -> Result<SiteInfo> {
        Ok(SiteInfo {
            url: self.url.clone(),
            title: self.title(),
            description: self.description(),
            keywords: self.keywords(),
            icon: self.icon()?,
            image: self.image()?,
        })
    }

    fn resolve(&self, field: &'static str, chain: &[Step]) -> String {
        for (idx, step) in chain.iter().enumerate() {
            let value = match step {
                Step::TitleText => self.document.first_text("title"),
                Step::Query(q) => self.document.find_attribute(q),
            };
            if !value.is_empty() {
                tracing::trace!(field, step = idx, ?step, "metadata.hit");
                return value;
            }
        }
        tracing::trace!(field, url = %self.url, "metadata.miss");
        String::new()
    }
}
