//! Read-only view over a leniently parsed HTML page.

use scraper::{ElementRef, Html};

/// "First `tag` whose `match_attr` equals `match_value`; give me its
/// `result_attr`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldQuery<'a> {
    pub tag: &'a str,
    pub match_attr: &'a str,
    pub match_value: &'a str,
    pub result_attr: &'a str,
}

impl<'a> FieldQuery<'a> {
    pub const fn new(
        tag: &'a str,
        match_attr: &'a str,
        match_value: &'a str,
        result_attr: &'a str,
    ) -> Self {
        Self {
            tag,
            match_attr,
            match_value,
            result_attr,
        }
    }

    pub const fn meta_property(property: &'a str) -> Self {
        Self::new("meta", "property", property, "content")
    }

    pub const fn meta_name(name: &'a str) -> Self {
        Self::new("meta", "name", name, "content")
    }

    pub const fn link_rel(rel: &'a str) -> Self {
        Self::new("link", "rel", rel, "href")
    }

    pub const fn link_sizes(sizes: &'a str) -> Self {
        Self::new("link", "sizes", sizes, "href")
    }
}

/// A page body parsed with html5ever's error-recovering tree builder.
///
/// Parsing never fails: malformed markup is repaired or dropped, and an
/// empty body yields a bare `<html><head></head><body></body></html>` tree.
pub struct ParsedDocument {
    html: Html,
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("parse_errors", &self.html.errors.len())
            .finish_non_exhaustive()
    }
}

impl ParsedDocument {
    pub fn parse(body: &str) -> Self {
        let html = Html::parse_document(body);
        if !html.errors.is_empty() {
            tracing::trace!(parse_errors = html.errors.len(), "html.parse.recovered");
        }
        Self { html }
    }

    pub fn empty() -> Self {
        Self::parse("")
    }

    /// Elements named `tag` (ASCII case-insensitive), in document order.
    pub fn elements_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| el.value().name().eq_ignore_ascii_case(tag))
    }

    /// Run a [`FieldQuery`]. The first matching element decides the result,
    /// even when it lacks `result_attr`; no match gives an empty string.
    /// A missing `match_attr` reads as `""`, so an empty `match_value`
    /// selects elements without that attribute.
    pub fn find_attribute(&self, query: &FieldQuery<'_>) -> String {
        // html5ever folds attribute names to lowercase
        let match_attr = query.match_attr.to_ascii_lowercase();
        let result_attr = query.result_attr.to_ascii_lowercase();

        self.elements_named(query.tag)
            .find(|el| el.value().attr(&match_attr).unwrap_or("") == query.match_value)
            .and_then(|el| el.value().attr(&result_attr).map(str::to_string))
            .unwrap_or_default()
    }

    /// Text content of the first element named `tag`, as written, or empty.
    pub fn first_text(&self, tag: &str) -> String {
        self.elements_named(tag)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }
}
