//! Article content extraction from raw HTML.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::{Captures, Regex};
use serde_json::Value;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([\w:.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid regex"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid regex"));
static NON_CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(?:script|style|noscript)>")
        .expect("valid regex")
});
static JSON_LD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<time\b[^>]*>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("valid regex")
});

const PUBLISHED_META_KEYS: [&str; 3] = [
    "article:published_time",
    "og:published_time",
    "published_time",
];
const DATE_META_KEYS: [&str; 5] = ["pubdate", "publishdate", "date", "dc.date", "datepublished"];

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ExtractedPage {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub published_date: Option<DateTime<Utc>>,
}

pub(crate) fn extract_page(html: &str) -> ExtractedPage {
    let content = NON_CONTENT_RE.replace_all(html, " ");
    ExtractedPage {
        title: extract_title(&content),
        paragraphs: extract_paragraphs(&content),
        published_date: extract_published_date(html),
    }
}

fn extract_title(html: &str) -> String {
    if let Some(title) = find_meta_content(html, &["og:title"]).filter(|t| !t.is_empty()) {
        return title;
    }
    [&*TITLE_RE, &*H1_RE]
        .into_iter()
        .find_map(|re| {
            re.captures(html)
                .map(|cap| clean_text(cap.get(1).map_or("", |m| m.as_str())))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default()
}

fn extract_paragraphs(html: &str) -> Vec<String> {
    PARAGRAPH_RE
        .captures_iter(html)
        .map(|cap| clean_text(cap.get(1).map_or("", |m| m.as_str())))
        .filter(|p| !p.is_empty())
        .collect()
}

fn extract_published_date(html: &str) -> Option<DateTime<Utc>> {
    find_meta_content(html, &PUBLISHED_META_KEYS)
        .and_then(|raw| parse_date(&raw))
        .or_else(|| json_ld_date_published(html))
        .or_else(|| {
            TIME_RE
                .find_iter(html)
                .find_map(|m| tag_attr(m.as_str(), "datetime").and_then(|raw| parse_date(&raw)))
        })
        .or_else(|| find_meta_content(html, &DATE_META_KEYS).and_then(|raw| parse_date(&raw)))
}

fn json_ld_date_published(html: &str) -> Option<DateTime<Utc>> {
    JSON_LD_RE.captures_iter(html).find_map(|cap| {
        let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
        let value = serde_json::from_str::<Value>(raw).ok()?;
        find_json_key(&value, "datePublished").and_then(parse_date)
    })
}

fn find_json_key<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    match value {
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_str)
            .or_else(|| map.values().find_map(|child| find_json_key(child, key))),
        Value::Array(items) => items.iter().find_map(|child| find_json_key(child, key)),
        _ => None,
    }
}

/// `content` of the first `<meta>` whose `property`, `name` or `itemprop`
/// matches one of `keys` (case-insensitive).
fn find_meta_content(html: &str, keys: &[&str]) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let matches_key = ["property", "name", "itemprop"].iter().any(|attr| {
            tag_attr(tag, attr)
                .is_some_and(|value| keys.iter().any(|k| value.eq_ignore_ascii_case(k)))
        });
        if matches_key {
            tag_attr(tag, "content").map(|content| clean_text(&content))
        } else {
            None
        }
    })
}

fn tag_attr(tag: &str, attr: &str) -> Option<String> {
    ATTR_RE.captures_iter(tag).find_map(|cap| {
        let name = cap.get(1)?.as_str();
        if !name.eq_ignore_ascii_case(attr) {
            return None;
        }
        cap.get(2)
            .or_else(|| cap.get(3))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Parse the date formats publishers put in article metadata.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Strip tags, decode entities and collapse whitespace.
pub(crate) fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    let decoded = decode_entities(&no_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(input: &str) -> String {
    ENTITY_RE
        .replace_all(input, |cap: &Captures<'_>| {
            let entity = &cap[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const ARTICLE: &str = r#"<html>
<head>
  <title>Fallback title | Daily</title>
  <meta property="og:title" content="Markets rally on rate cut">
  <meta property="article:published_time" content="2024-03-05T14:30:00Z">
  <script>var p = "<p>not content</p>";</script>
</head>
<body>
  <h1>Markets rally</h1>
  <p>Stocks <b>rose</b> sharply on Tuesday.</p>
  <p class="x">Investors cheered the &quot;surprise&quot; move &amp; bought.</p>
  <p>   </p>
</body>
</html>"#;

    #[test]
    fn prefers_og_title() {
        assert_eq!(extract_page(ARTICLE).title, "Markets rally on rate cut");
    }

    #[test]
    fn falls_back_to_title_then_h1() {
        let page = extract_page("<title> Plain </title><h1>Heading</h1>");
        assert_eq!(page.title, "Plain");
        let page = extract_page("<h1>Only <em>heading</em></h1>");
        assert_eq!(page.title, "Only heading");
    }

    #[test]
    fn collects_cleaned_paragraphs_outside_scripts() {
        let page = extract_page(ARTICLE);
        assert_eq!(
            page.paragraphs,
            vec![
                "Stocks rose sharply on Tuesday.",
                "Investors cheered the \"surprise\" move & bought.",
            ]
        );
    }

    #[test]
    fn reads_published_time_meta() {
        assert_eq!(
            extract_page(ARTICLE).published_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn reads_json_ld_date_published() {
        let html = r#"<script type="application/ld+json">{"@graph":[{"@type":"NewsArticle","datePublished":"2023-11-02T08:00:00+01:00"}]}</script>"#;
        assert_eq!(
            extract_page(html).published_date,
            Some(Utc.with_ymd_and_hms(2023, 11, 2, 7, 0, 0).unwrap())
        );
    }

    #[test]
    fn reads_time_element_and_date_meta() {
        let html = r#"<time class="stamp" datetime="2022-01-15">Jan 15</time>"#;
        assert_eq!(
            extract_page(html).published_date,
            Some(Utc.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap())
        );
        let html = r#"<meta name="pubdate" content="Tue, 1 Jul 2003 10:52:37 +0200">"#;
        assert_eq!(
            extract_page(html).published_date,
            Some(Utc.with_ymd_and_hms(2003, 7, 1, 8, 52, 37).unwrap())
        );
    }

    #[test]
    fn missing_date_is_none() {
        assert_eq!(extract_page("<p>no dates here</p>").published_date, None);
    }

    #[test]
    fn decodes_numeric_and_named_entities() {
        assert_eq!(clean_text("caf&#233; &#x2014; it&rsquo;s &bogus;"), "café — it’s &bogus;");
    }

    #[test]
    fn attribute_values_may_contain_other_quote() {
        let html = r#"<meta name="og:title" content="Investor's day">"#;
        assert_eq!(extract_page(html).title, "Investor's day");
    }
}
