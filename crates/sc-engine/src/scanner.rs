//! Bracket tag scanning and in-place expansion.
//!
//! Finds `[tag attrs]` and `[tag attrs]content[/tag]` spans, asks a lookup
//! function whether each tag is handled, and splices the handler's output
//! back into the text.

use crate::Attributes;

/// Handling instructions for one recognized tag.
///
/// Returned by the lookup function passed to [`expand`]. The content
/// processor receives the parsed attributes and, for wrapping tags, the raw
/// text between the opening and closing tag.
pub struct TagInfo<'a> {
    /// Whether the tag wraps content up to a matching `[/tag]`.
    pub wraps_content: bool,
    /// Produces the replacement text.
    pub content_processor: Box<ContentProcessor<'a>>,
}

/// Replacement producer carried by [`TagInfo`].
pub type ContentProcessor<'a> = dyn FnOnce(Attributes, Option<&str>) -> String + 'a;

impl<'a> TagInfo<'a> {
    /// Describe a tag that stands alone: `[tag attrs]`.
    pub fn self_closing<F>(processor: F) -> Self
    where
        F: FnOnce(Attributes, Option<&str>) -> String + 'a,
    {
        Self::new(false, processor)
    }

    /// Describe a tag that wraps content: `[tag attrs]content[/tag]`.
    pub fn wrapping<F>(processor: F) -> Self
    where
        F: FnOnce(Attributes, Option<&str>) -> String + 'a,
    {
        Self::new(true, processor)
    }

    /// Describe a tag, choosing whether it wraps content at runtime.
    pub fn new<F>(wraps_content: bool, processor: F) -> Self
    where
        F: FnOnce(Attributes, Option<&str>) -> String + 'a,
    {
        Self {
            wraps_content,
            content_processor: Box::new(processor),
        }
    }
}

/// Returns `true` for bytes that may appear in a tag name while scanning.
///
/// `[` is accepted so that `[[tag]` is read as one unknown name rather than
/// as a literal bracket followed by a tag.
fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'['
}

/// Result of scanning an opening tag's attribute text.
enum OpenTag {
    /// Byte offset of the closing `]`.
    Closed(usize),
    /// No unquoted `]` before the last `]` of the text.
    Unterminated,
}

/// Find the unquoted `]` ending an opening tag.
///
/// Scans `text[from..=bound]`. A `"` opens a quoted run, and closes it unless
/// the preceding character is a backslash.
fn find_tag_end(text: &str, from: usize, bound: usize) -> OpenTag {
    let mut in_quote = false;
    let mut prev = None;

    for (offset, c) in text[from..=bound].char_indices() {
        if c == '"' {
            in_quote = !in_quote || prev == Some('\\');
        }
        if !in_quote && c == ']' {
            return OpenTag::Closed(from + offset);
        }
        prev = Some(c);
    }

    OpenTag::Unterminated
}

/// Expand every handled tag in `text`.
///
/// Scanning is a single forward pass over a growing/shrinking buffer:
///
/// 1. Find the next `[` at or after the cursor. If none, stop.
/// 2. Find the last `]` at or after it. If none, nothing can close anymore: stop.
/// 3. Read the tag name (`[a-z0-9[]*`). Unknown or empty names are left as
///    literal text and scanning resumes after the name, so `[[tag]` and
///    `[[tag]x[/tag]]` stay verbatim.
/// 4. Find the first unquoted `]` up to the last `]`. If none, the tag is
///    unterminated and the rest of the text is returned as-is.
/// 5. For wrapping tags, find the literal `[/name]`. If missing, the opening
///    tag is left untouched and scanning resumes after it.
/// 6. Replace the whole span with the content processor's output and resume
///    scanning after the inserted text.
///
/// Inserted text is never rescanned. Nested tags are expanded by handlers
/// that explicitly process their own content.
///
/// # Example
///
/// ```
/// use sc_engine::{TagInfo, expand};
///
/// let output = expand("a [dolor] b [x]", |tag| match tag {
///     "dolor" => Some(TagInfo::self_closing(|attrs, _| {
///         attrs.text("text").unwrap_or("banana").to_owned()
///     })),
///     _ => None,
/// });
/// assert_eq!(output, "a banana b [x]");
/// ```
pub fn expand<'a, F>(text: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<TagInfo<'a>>,
{
    let mut text = text.to_owned();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find('[') {
        let start = cursor + found;

        let Some(last_close) = text[start..].rfind(']').map(|i| start + i) else {
            return text;
        };

        let name_start = start + 1;
        let name_len = text.as_bytes()[name_start..]
            .iter()
            .take_while(|b| is_tag_byte(**b))
            .count();
        let name_end = name_start + name_len;
        cursor = name_end;

        if name_len == 0 {
            continue;
        }
        let name = text[name_start..name_end].to_owned();
        let Some(info) = lookup(&name) else {
            continue;
        };

        if last_close < name_end {
            continue;
        }

        let tag_end = match find_tag_end(&text, name_end, last_close) {
            OpenTag::Closed(pos) => pos,
            OpenTag::Unterminated => {
                tracing::trace!(tag = %name, offset = start, "unterminated tag, stopping scan");
                return text;
            }
        };
        let attrs = Attributes::parse(&text[name_end..tag_end]);
        let mut span_end = tag_end + 1;

        let content = if info.wraps_content {
            let closing = format!("[/{name}]");
            let Some(found) = text[span_end..].find(&closing) else {
                tracing::trace!(tag = %name, offset = start, "no closing tag, leaving as-is");
                cursor = span_end;
                continue;
            };
            let content = text[span_end..span_end + found].to_owned();
            span_end += found + closing.len();
            Some(content)
        } else {
            None
        };

        let replacement = (info.content_processor)(attrs, content.as_deref());
        text.replace_range(start..span_end, &replacement);
        cursor = start + replacement.len();
    }

    text
}
