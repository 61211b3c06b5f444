use std::collections::BTreeMap;

use crate::post::PostMetadata;
use crate::text_utils::parse_published_at;

/// Sentinel line delimiting the metadata block at the top of a post file.
pub const MARKER: &str = "---";

/// Splits a raw post document into its metadata block and body.
///
/// The block is delimited by a leading `---` line and a matching closing
/// `---` line; the body is everything after the closing line, trimmed.
pub fn split_front_matter(raw: &str) -> Result<(&str, &str), String> {
    let doc = raw.trim_start();
    if !doc.starts_with(MARKER) {
        return Err("Missing front-matter block".to_string());
    }

    let rest = &doc[MARKER.len()..];
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let Some(rest) = rest.strip_prefix('\n') else {
        return Err("Missing front-matter block".to_string());
    };

    let mut search_from = 0;
    loop {
        let Some(found) = rest[search_from..].find(MARKER) else {
            return Err("Front-matter block has no closing marker".to_string());
        };
        let at = search_from + found;

        // The closing marker has to open its own line and the line must
        // hold nothing else.
        let opens_line = at == 0 || rest.as_bytes()[at - 1] == b'\n';
        let line_end = rest[at..].find('\n').map(|x| at + x).unwrap_or(rest.len());
        let line_is_bare = rest[at + MARKER.len()..line_end].trim().is_empty();

        if opens_line && line_is_bare {
            let block = &rest[..at];
            let body = &rest[line_end..];
            return Ok((block, body.trim()));
        }

        search_from = line_end;
        if search_from >= rest.len() {
            return Err("Front-matter block has no closing marker".to_string());
        }
    }
}

/// Parses the metadata block as `key: value` lines into a validated
/// record. Recognized keys are checked for presence; everything else is
/// kept in the extension map so older servers keep serving posts written
/// with newer keys.
pub fn parse_front_matter(block: &str) -> Result<PostMetadata, String> {
    let mut title: Option<String> = None;
    let mut published_at: Option<String> = None;
    let mut summary: Option<String> = None;
    let mut image: Option<String> = None;
    let mut extra: BTreeMap<String, String> = BTreeMap::new();

    for line in block.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(format!("Front-matter line is not key: value - {}", line.trim()));
        };

        let key = key.trim();
        let value = strip_quotes(value.trim()).to_string();

        match key {
            "title" => title = Some(value),
            "publishedAt" => published_at = Some(value),
            "summary" => summary = Some(value),
            "image" => image = Some(value),
            _ => {
                extra.insert(key.to_string(), value);
            }
        }
    }

    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return Err("Missing required front-matter key title".to_string());
    };
    let Some(published_at) = published_at else {
        return Err("Missing required front-matter key publishedAt".to_string());
    };
    let Some(summary) = summary else {
        return Err("Missing required front-matter key summary".to_string());
    };

    if let Err(e) = parse_published_at(&published_at) {
        return Err(format!("Invalid publishedAt - {}", e));
    }

    Ok(PostMetadata {
        title,
        published_at,
        summary,
        image,
        extra,
    })
}

/// Strips one pair of surrounding quote characters. Mirrors the loose
/// convention the posts were written with: either quote character may
/// appear at either end.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        let is_quote = |c: u8| c == b'"' || c == b'\'';
        if is_quote(first) && is_quote(last) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::POST_DATA;

    #[test]
    fn test_split_front_matter() {
        let (block, body) = split_front_matter(POST_DATA).unwrap();
        assert!(block.contains("title:"));
        assert!(block.contains("publishedAt:"));
        assert!(body.starts_with("How to be a great software engineer?"));
        assert!(!body.contains(MARKER));
    }

    #[test]
    fn test_split_trims_body() {
        let raw = "---\ntitle: \"T\"\npublishedAt: \"2024-01-01\"\nsummary: \"S\"\n---\n\nHello\n\n";
        let (_block, body) = split_front_matter(raw).unwrap();
        assert_eq!(body, "Hello");
    }

    #[test]
    fn test_split_missing_opening_marker() {
        let raw = "title: \"T\"\n\nHello";
        assert!(split_front_matter(raw).is_err());
    }

    #[test]
    fn test_split_missing_closing_marker() {
        let raw = "---\ntitle: \"T\"\npublishedAt: \"2024-01-01\"\nsummary: \"S\"\n\nHello";
        assert!(split_front_matter(raw).is_err());
    }

    #[test]
    fn test_split_ignores_dashes_inside_a_line() {
        let raw = "---\ntitle: \"About --- markers\"\npublishedAt: \"2024-01-01\"\nsummary: \"S\"\n---\nHello";
        let (block, body) = split_front_matter(raw).unwrap();
        assert!(block.contains("About --- markers"));
        assert_eq!(body, "Hello");
    }

    #[test]
    fn test_parse_front_matter() {
        let block = "title: \"Hello World\"\npublishedAt: \"2023-05-01\"\nsummary: \"First post\"\n";
        let metadata = parse_front_matter(block).unwrap();
        assert_eq!(metadata.title, "Hello World");
        assert_eq!(metadata.published_at, "2023-05-01");
        assert_eq!(metadata.summary, "First post");
        assert_eq!(metadata.image, None);
        assert!(metadata.extra.is_empty());
    }

    #[test]
    fn test_parse_front_matter_image_and_extra() {
        let block = "title: T\npublishedAt: 2023-05-01\nsummary: S\nimage: /images/cover.png\ndraft: true\nlang: en\n";
        let metadata = parse_front_matter(block).unwrap();
        assert_eq!(metadata.image, Some("/images/cover.png".to_string()));
        assert_eq!(metadata.extra.get("draft"), Some(&"true".to_string()));
        assert_eq!(metadata.extra.get("lang"), Some(&"en".to_string()));
    }

    #[test]
    fn test_parse_front_matter_value_with_colon() {
        let block = "title: \"Rust: the good parts\"\npublishedAt: 2023-05-01\nsummary: S\n";
        let metadata = parse_front_matter(block).unwrap();
        assert_eq!(metadata.title, "Rust: the good parts");
    }

    #[test]
    fn test_parse_front_matter_missing_required_keys() {
        let res = parse_front_matter("publishedAt: 2023-05-01\nsummary: S\n");
        assert!(res.unwrap_err().contains("title"));

        let res = parse_front_matter("title: T\nsummary: S\n");
        assert!(res.unwrap_err().contains("publishedAt"));

        let res = parse_front_matter("title: T\npublishedAt: 2023-05-01\n");
        assert!(res.unwrap_err().contains("summary"));
    }

    #[test]
    fn test_parse_front_matter_bad_date() {
        let res = parse_front_matter("title: T\npublishedAt: someday\nsummary: S\n");
        assert!(res.unwrap_err().contains("publishedAt"));
    }

    #[test]
    fn test_parse_front_matter_line_without_colon() {
        let res = parse_front_matter("title: T\npublishedAt 2023-05-01\nsummary: S\n");
        assert!(res.is_err());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"Hello\""), "Hello");
        assert_eq!(strip_quotes("'Hello'"), "Hello");
        // Mismatched pairs were accepted by the old site, keep accepting them
        assert_eq!(strip_quotes("'Hello\""), "Hello");
        assert_eq!(strip_quotes("Hello"), "Hello");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes(""), "");
    }
}
