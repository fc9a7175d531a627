use anyhow::Result;
use serde_json::{Map, Value};
use siteinfo_web::MetadataExtractor;

use crate::cli::Field;

fn field_value(page: &MetadataExtractor, field: Field) -> Result<String> {
    Ok(match field {
        Field::Title => page.title(),
        Field::Description => page.description(),
        Field::Keywords => page.keywords(),
        Field::Icon => page.icon()?,
        Field::Image => page.image()?,
    })
}

/// Render one page for stdout (no trailing newline).
pub fn render(page: &MetadataExtractor, field: Option<Field>, json: bool) -> Result<String> {
    match (field, json) {
        (Some(field), false) => field_value(page, field),
        (Some(field), true) => {
            let mut obj = Map::new();
            obj.insert("url".into(), Value::from(page.url()));
            obj.insert(field.key().into(), Value::from(field_value(page, field)?));
            Ok(Value::Object(obj).to_string())
        }
        (None, true) => Ok(serde_json::to_string(&page.summary()?)?),
        (None, false) => {
            let info = page.summary()?;
            Ok([
                ("url", &info.url),
                ("title", &info.title),
                ("description", &info.description),
                ("keywords", &info.keywords),
                ("icon", &info.icon),
                ("image", &info.image),
            ]
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n"))
        }
    }
}
