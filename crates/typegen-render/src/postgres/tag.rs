//! Column options read from the `postgres` tag.

use typegen_core::FieldTag;

const FLAGS: &[&str] = &["unique", "nullable", "indexed", "primarykey", "uniquecomposite"];
const KEYS: &[&str] = &[
    "type",
    "default",
    "check",
    "onupdate",
    "ondelete",
    "generated",
    "generatedstored",
];

/// Column options of one field.
///
/// ```text
/// postgres:"email,unique,indexed,check:(length(email) > 3)"
/// ```
///
/// Values are raw SQL and are emitted as written. Empty values count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnTag {
    pub name: Option<String>,
    pub skip: bool,
    pub unique: bool,
    pub nullable: bool,
    pub indexed: bool,
    pub primary_key: bool,
    /// Member of the table's composite `UNIQUE (...)` constraint
    pub unique_composite: bool,
    /// Column type replacing the derived one
    pub sql_type: Option<String>,
    pub default: Option<String>,
    pub check: Option<String>,
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
    pub generated: Option<String>,
    pub generated_stored: Option<String>,
}

impl From<&FieldTag> for ColumnTag {
    fn from(tag: &FieldTag) -> Self {
        let value = |key: &str| {
            tag.value(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        for option in tag.other_options(&[FLAGS, KEYS].concat()) {
            tracing::trace!(option = option.raw(), "ignoring unknown column option");
        }

        Self {
            name: tag.name().map(str::to_string),
            skip: tag.skip(),
            unique: tag.has_flag("unique"),
            nullable: tag.has_flag("nullable"),
            indexed: tag.has_flag("indexed"),
            primary_key: tag.has_flag("primarykey"),
            unique_composite: tag.has_flag("uniquecomposite"),
            sql_type: value("type"),
            default: value("default"),
            check: value("check"),
            on_update: value("onupdate"),
            on_delete: value("ondelete"),
            generated: value("generated"),
            generated_stored: value("generatedstored"),
        }
    }
}
