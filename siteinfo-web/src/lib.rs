//! Page metadata for link previews.
//!
//! - Fail-soft page fetching and lenient parsing (`loader`, `document`)
//! - Title/description/keywords/icon/image fallback chains (`extract`)
//! - Relative-to-absolute URL resolution (`absolute`)
//!
//! ```no_run
//! # async fn demo() -> siteinfo_common::Result<()> {
//! use siteinfo_web::MetadataExtractor;
//!
//! let page = MetadataExtractor::from_url("https://example.com/").await?;
//! println!("{} / {}", page.title(), page.image()?);
//! # Ok(()) }
//! ```

pub mod absolute;
pub mod document;
pub mod extract;
pub mod loader;

pub use document::{FieldQuery, ParsedDocument};
pub use extract::{MetadataExtractor, SiteInfo};
pub use loader::{PageLoader, PageSource};
