//! Field annotation tags.
//!
//! A field carries one raw annotation string made of `key:"value"` pairs
//! (`StructTag`). Each value follows a shared element grammar (`FieldTag`):
//!
//! ```text
//! name[,option]*
//! ```
//!
//! - element 0 is `-` (skip the field) or the renamed identifier (empty keeps the name)
//! - remaining elements are bare flags (`optional`, `unique`, ...) or `key:value` pairs
//! - commas inside parentheses or quotes do not split; `''` escapes a single quote
//!
//! The grammar does not know any vocabulary. Every option is preserved verbatim
//! and each renderer decides which flags and keys it understands.

use std::borrow::Cow;
use std::str::FromStr;

/// Errors from interpreting a tag element.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("invalid value `{value}` for tag option `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Raw annotation text of a field: `json:"id,omitempty" postgres:"id,unique"`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Value associated with `key`, unquoted.
    ///
    /// Returns `None` when the key is absent or the text is malformed before
    /// the key is reached.
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        let mut rest = self.0.as_str();

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                return None;
            }

            let name_len = rest
                .bytes()
                .take_while(|&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
                .count();
            let bytes = rest.as_bytes();
            if name_len == 0
                || name_len + 1 >= bytes.len()
                || bytes[name_len] != b':'
                || bytes[name_len + 1] != b'"'
            {
                return None;
            }

            let name = &rest[..name_len];
            rest = &rest[name_len + 1..];

            // Scan the quoted value, honouring backslash escapes.
            let bytes = rest.as_bytes();
            let mut end = 1;
            while end < bytes.len() && bytes[end] != b'"' {
                if bytes[end] == b'\\' {
                    end += 1;
                }
                end += 1;
            }
            if end >= bytes.len() {
                return None;
            }

            let quoted = &rest[1..end];
            rest = &rest[end + 1..];

            if name == key {
                return Some(unescape(quoted));
            }
        }
    }
}

fn unescape(quoted: &str) -> Cow<'_, str> {
    if !quoted.contains('\\') {
        return Cow::Borrowed(quoted);
    }

    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

/// One element after the name: a bare flag or a `key:value` pair.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TagOption {
    raw: String,
}

impl TagOption {
    /// The element exactly as written (trimmed).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `key:value` split at the first colon.
    pub fn pair(&self) -> Option<(&str, &str)> {
        self.raw.split_once(':')
    }

    pub fn is_flag(&self, flag: &str) -> bool {
        self.raw.eq_ignore_ascii_case(flag)
    }
}

/// A parsed tag value.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FieldTag {
    name: String,
    skip: bool,
    options: Vec<TagOption>,
}

impl FieldTag {
    /// Parse a tag value. Blank input means "no tag" and yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        let elements = split_elements(trimmed);
        if elements.len() == 1 && elements[0] == "-" {
            return Some(Self {
                skip: true,
                ..Self::default()
            });
        }

        let mut elements = elements.into_iter();
        let name = elements.next().unwrap_or_default().to_string();
        let options = elements
            .filter(|e| !e.is_empty())
            .map(|e| TagOption { raw: e.to_string() })
            .collect();

        Some(Self {
            name,
            skip: false,
            options,
        })
    }

    /// Renamed identifier, if element 0 is non-empty.
    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    pub fn skip(&self) -> bool {
        self.skip
    }

    pub fn options(&self) -> &[TagOption] {
        &self.options
    }

    /// Whether a bare flag is present (case-insensitive).
    pub fn has_flag(&self, flag: &str) -> bool {
        self.options.iter().any(|o| o.is_flag(flag))
    }

    pub fn has_any_flag(&self, flags: &[&str]) -> bool {
        flags.iter().any(|f| self.has_flag(f))
    }

    /// Value of the first `key:value` option whose key matches (case-insensitive).
    pub fn value(&self, key: &str) -> Option<&str> {
        self.options.iter().find_map(|o| match o.pair() {
            Some((k, v)) if k.trim().eq_ignore_ascii_case(key) => Some(v.trim()),
            _ => None,
        })
    }

    /// Typed value of a `key:value` option. Absent keys are `Ok(None)`.
    pub fn parse_value<T: FromStr>(&self, key: &str) -> Result<Option<T>, TagError> {
        let Some(raw) = self.value(key) else {
            return Ok(None);
        };
        raw.parse().map(Some).map_err(|_| TagError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }

    /// Options that are not in `known` (flags or pair keys).
    pub fn other_options<'a>(&'a self, known: &'a [&str]) -> impl Iterator<Item = &'a TagOption> {
        self.options.iter().filter(move |o| {
            let key = o.pair().map_or(o.raw(), |(k, _)| k.trim());
            !known.iter().any(|k| k.eq_ignore_ascii_case(key))
        })
    }
}

/// Split on top-level commas.
///
/// Commas inside parentheses, single quotes (with `''` escaping) or double
/// quotes do not split. Elements are trimmed; empty elements are kept so that
/// an empty element 0 stays distinguishable.
pub fn split_elements(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];

        if !in_double && c == b'\'' {
            if in_single && bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            in_single = !in_single;
            i += 1;
            continue;
        }

        if !in_single && c == b'"' {
            in_double = !in_double;
            i += 1;
            continue;
        }

        if !in_single && !in_double {
            match c {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    out.push(s[start..i].trim());
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }

    out.push(s[start..].trim());
    out
}
