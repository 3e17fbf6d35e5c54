//! The `jsonschema` tag vocabulary.

use serde_json::Number;
use typegen_core::FieldTag;
use typegen_core::tag::TagError;

/// Options of a schema tag: `jsonschema:"name,optional,minLength:3,format:email"`.
///
/// Constraints are present only when written; an explicit zero is kept.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SchemaTag {
    pub name: Option<String>,
    pub skip: bool,
    pub optional: bool,
    /// Overrides any inferred format.
    pub format: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl SchemaTag {
    pub fn from_tag(tag: &FieldTag) -> Result<Self, TagError> {
        if tag.skip() {
            return Ok(Self {
                skip: true,
                ..Self::default()
            });
        }

        Ok(Self {
            name: tag.name().map(str::to_string),
            skip: false,
            optional: tag.has_flag("optional"),
            format: tag
                .value("format")
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            min_length: tag.parse_value("minLength")?,
            max_length: tag.parse_value("maxLength")?,
            minimum: tag.parse_value("minimum")?,
            maximum: tag.parse_value("maximum")?,
            min_items: tag.parse_value("minItems")?,
            max_items: tag.parse_value("maxItems")?,
        })
    }
}
