//! Leading `---` front-matter blocks in markdown sources

use serde::Deserialize;

/// Split a raw document into its front matter and body.
///
/// A front-matter block must start at the very first byte with a line that
/// is exactly `---` and end at the next line that is exactly `---`. The
/// returned front matter excludes both delimiter lines; the body starts
/// right after the closing delimiter's line terminator. Documents without a
/// complete block are returned untouched.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let (matter, tail) = rest.split_at(offset);
            let (_, body) = tail.split_at(line.len());
            return (Some(matter), body);
        }
        offset += line.len();
    }

    (None, raw)
}

/// Body of a document with any leading front matter removed
pub fn strip_front_matter(raw: &str) -> &str {
    split_front_matter(raw).1
}

/// Page metadata read from a front-matter block
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PageMeta {
    /// Deserialize a front-matter block as YAML.
    ///
    /// Keys other than `title` and `description` are ignored. Blank values
    /// count as missing.
    pub fn parse(matter: &str) -> Result<Self, serde_yaml::Error> {
        if matter.trim().is_empty() {
            return Ok(Self::default());
        }
        let meta: Self = serde_yaml::from_str(matter)?;
        Ok(Self {
            title: non_blank(meta.title),
            description: non_blank(meta.description),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_block() {
        let raw = "---\ntitle: X\n---\nBody text";
        assert_eq!(split_front_matter(raw), (Some("title: X\n"), "Body text"));
    }

    #[test]
    fn test_no_block_is_verbatim() {
        let raw = "# Heading\n\n---\nnot front matter\n---\n";
        assert_eq!(strip_front_matter(raw), raw);
    }

    #[test]
    fn test_block_must_start_at_first_byte() {
        let raw = "\n---\ntitle: X\n---\nBody";
        assert_eq!(strip_front_matter(raw), raw);
    }

    #[test]
    fn test_unterminated_block_is_verbatim() {
        let raw = "---\ntitle: X\nBody";
        assert_eq!(strip_front_matter(raw), raw);
    }

    #[test]
    fn test_crlf_delimiters() {
        let raw = "---\r\ntitle: X\r\n---\r\nBody\r\n";
        assert_eq!(strip_front_matter(raw), "Body\r\n");
    }

    #[test]
    fn test_delimiter_must_be_exact() {
        // `----` and `--- ` are content, not delimiters
        let raw = "---\na: 1\n----\n--- \n---\nBody";
        assert_eq!(split_front_matter(raw), (Some("a: 1\n----\n--- \n"), "Body"));
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(split_front_matter("---\n---\nBody"), (Some(""), "Body"));
        assert_eq!(split_front_matter("---\n---"), (Some(""), ""));
    }

    #[test]
    fn test_meta_quoted_scalars() {
        let matter = "title: \"Call State Machine\"\ndescription: 'How calls move'\nicon: phone\n";
        let meta = PageMeta::parse(matter).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Call State Machine"));
        assert_eq!(meta.description.as_deref(), Some("How calls move"));
    }

    #[test]
    fn test_meta_folded_description_and_comment() {
        let matter = "title: Call Flows # internal\ndescription: >-\n  How inbound calls\n  are routed\n";
        let meta = PageMeta::parse(matter).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Call Flows"));
        assert_eq!(
            meta.description.as_deref(),
            Some("How inbound calls are routed")
        );
    }

    #[test]
    fn test_meta_escapes_and_block_scalar() {
        let matter = "title: \"Tabs\\tand \\\"quotes\\\"\"\ndescription: |\n  line one\n  line two\n";
        let meta = PageMeta::parse(matter).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Tabs\tand \"quotes\""));
        assert_eq!(meta.description.as_deref(), Some("line one\nline two\n"));
    }

    #[test]
    fn test_meta_blank_and_missing() {
        assert_eq!(PageMeta::parse("").unwrap(), PageMeta::default());
        let meta = PageMeta::parse("title: \"\"\nicon:\n").unwrap();
        assert_eq!(meta, PageMeta::default());
    }

    #[test]
    fn test_meta_invalid_yaml() {
        assert!(PageMeta::parse("title: [unclosed\n").is_err());
    }
}
