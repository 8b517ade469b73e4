//! Shortcode attribute parsing.
//!
//! Parses the raw text between a tag name and its closing bracket:
//! `[tag id=2 uid="1234-5678" disabled]` yields `id`, `uid` and `disabled`.

use indexmap::IndexMap;

/// Value of a single attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// Attribute written as `key=value` or `key="value"`.
    Text(String),
    /// Attribute written without a value (`[tag disabled]`), or with an empty one.
    Flag,
}

impl AttrValue {
    /// Text value, or `None` for a flag.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag => None,
        }
    }

    /// Returns `true` for a valueless attribute.
    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered attribute map.
///
/// Keys keep the order of their first appearance. A key repeated later in
/// the same tag overwrites the earlier value in place.
///
/// # Grammar
///
/// - Unquoted spaces separate pairs; runs of spaces count as one separator.
/// - The first unquoted `=` after a non-empty key starts the value. Any
///   further `=` is part of the value.
/// - `"` opens a quoted run in which spaces and `=` are literal. The quote
///   characters are dropped. Inside a quoted run `\"` is a literal quote.
/// - A key with no value, or an empty one, is a [`AttrValue::Flag`].
/// - An unterminated quote runs to the end of the input.
///
/// # Example
///
/// ```
/// use sc_engine::{AttrValue, Attributes};
///
/// let attrs = Attributes::parse(r#"id=2 title="Hello world" disabled"#);
/// assert_eq!(attrs.text("id"), Some("2"));
/// assert_eq!(attrs.text("title"), Some("Hello world"));
/// assert_eq!(attrs.get("disabled"), Some(&AttrValue::Flag));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<String, AttrValue>,
}

impl Attributes {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an attribute string.
    ///
    /// Works on `char`s, so multi-byte keys and values are kept intact.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut attrs = Self::new();

        let mut key = String::new();
        let mut value = String::new();
        let mut in_key = true;
        let mut in_quote = false;

        let mut pos = 0;
        while pos < chars.len() {
            let mut c = chars[pos];

            if in_quote {
                if c == '"' && pos > 0 && chars[pos - 1] != '\\' {
                    in_quote = false;
                    pos += 1;
                    continue;
                }
                if c == '\\' && chars.get(pos + 1) == Some(&'"') {
                    // Escaped quote: keep the quote, drop the backslash.
                    c = '"';
                    pos += 1;
                }
            } else {
                match c {
                    ' ' => {
                        attrs.flush(&mut key, &mut value);
                        in_key = true;
                        pos += 1;
                        continue;
                    }
                    '=' if in_key && !key.is_empty() => {
                        in_key = false;
                        pos += 1;
                        continue;
                    }
                    '"' => {
                        in_quote = true;
                        pos += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            if in_key {
                key.push(c);
            } else {
                value.push(c);
            }
            pos += 1;
        }

        attrs.flush(&mut key, &mut value);
        attrs
    }

    fn flush(&mut self, key: &mut String, value: &mut String) {
        if !key.is_empty() {
            let parsed = if value.is_empty() {
                AttrValue::Flag
            } else {
                AttrValue::Text(std::mem::take(value))
            };
            self.entries.insert(std::mem::take(key), parsed);
        }
        key.clear();
        value.clear();
    }

    /// Insert or overwrite an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    /// Text value of an attribute; `None` if absent or a flag.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    /// Returns `true` if the attribute is present, with or without value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttrValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
