use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A field the service sends as either a string or a number.
///
/// Article fields such as `author` or `next_page_id` are not consistently typed by the
/// service. Wrapping them in `Option<LooseValue>` keeps the three cases (absent, string,
/// number) statically distinguishable instead of falling back to `serde_json::Value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    /// A JSON string.
    Text(String),
    /// A JSON number, kept in its original integer or float form.
    Number(serde_json::Number),
}

impl LooseValue {
    /// Returns the string content if this is a `Text` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Returns the value as an `i64` if it is an integral number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(_) => None,
        }
    }

    /// Returns the value as an `f64` if it is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for LooseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for LooseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LooseValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for LooseValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An article as returned by the Parser API and the Reader API.
///
/// Missing fields decode to their zero value, so a partial payload such as
/// `{"author": "Steve Jobs", "short_url": "http://rdd.me/4ksnrhhl"}` is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    /// Author name, when the service could determine one.
    pub author: Option<LooseValue>,
    /// Cleaned HTML content.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// Publication date as reported by the service.
    pub date_published: Option<LooseValue>,
    /// Sub-headline.
    pub dek: Option<LooseValue>,
    /// Text direction, `ltr` or `rtl`.
    #[serde(deserialize_with = "null_as_default")]
    pub direction: String,
    /// Domain the article was fetched from.
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    /// Short plain-text excerpt.
    #[serde(deserialize_with = "null_as_default")]
    pub excerpt: String,
    /// URL of the lead image.
    #[serde(deserialize_with = "null_as_default")]
    pub lead_image_url: String,
    /// Identifier of the next page for multi-page articles.
    pub next_page_id: Option<LooseValue>,
    /// Number of pages rendered into `content`.
    #[serde(deserialize_with = "null_as_default")]
    pub rendered_pages: i64,
    /// Shortened URL.
    #[serde(deserialize_with = "null_as_default")]
    pub short_url: String,
    /// Article title.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Total number of pages of the source article.
    #[serde(deserialize_with = "null_as_default")]
    pub total_pages: i64,
    /// Canonical URL of the article.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Number of words in `content`.
    #[serde(deserialize_with = "null_as_default")]
    pub word_count: i64,
}

/// Parser API confidence score for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// The URL that was scored.
    #[serde(default)]
    pub url: String,
    /// How confident the parser is that it can extract an article.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_partial_article_leaves_other_fields_empty() {
        let article: Article = serde_json::from_str(
            r#"{"author": "Steve Jobs", "short_url": "http://rdd.me/4ksnrhhl"}"#,
        )
        .unwrap();

        assert_eq!(article.author, Some(LooseValue::from("Steve Jobs")));
        assert_eq!(article.short_url, "http://rdd.me/4ksnrhhl");
        assert_eq!(
            article,
            Article {
                author: Some("Steve Jobs".into()),
                short_url: "http://rdd.me/4ksnrhhl".to_string(),
                ..Article::default()
            }
        );
    }

    #[test]
    fn test_loose_fields_accept_strings_numbers_and_null() {
        let article: Article = serde_json::from_str(
            r#"{
                "author": null,
                "date_published": "2012-06-01 00:00:00",
                "dek": 42,
                "next_page_id": 1.5
            }"#,
        )
        .unwrap();

        assert_eq!(article.author, None);
        assert_eq!(
            article.date_published.as_ref().and_then(LooseValue::as_str),
            Some("2012-06-01 00:00:00")
        );
        assert_eq!(article.dek.as_ref().and_then(LooseValue::as_i64), Some(42));
        assert_eq!(
            article.next_page_id.as_ref().and_then(LooseValue::as_f64),
            Some(1.5)
        );
    }

    #[test]
    fn test_null_plain_fields_decode_to_zero_values() {
        let article: Article =
            serde_json::from_str(r#"{"title": null, "word_count": null, "content": "<p>hi</p>"}"#)
                .unwrap();

        assert_eq!(article.title, "");
        assert_eq!(article.word_count, 0);
        assert_eq!(article.content, "<p>hi</p>");
    }

    #[test]
    fn test_full_article() {
        let json = serde_json::json!({
            "author": "Jane Doe",
            "content": "<div>body</div>",
            "date_published": null,
            "dek": "A sub headline",
            "direction": "ltr",
            "domain": "www.example.com",
            "excerpt": "body",
            "lead_image_url": "http://www.example.com/lead.png",
            "next_page_id": null,
            "rendered_pages": 1,
            "short_url": "http://rdd.me/abc",
            "title": "An Example",
            "total_pages": 2,
            "url": "http://www.example.com/article",
            "word_count": 250
        });

        let article: Article = serde_json::from_value(json).unwrap();
        assert_eq!(article.lead_image_url, "http://www.example.com/lead.png");
        assert_eq!(article.total_pages, 2);
        assert_eq!(article.rendered_pages, 1);
        assert_eq!(article.word_count, 250);
        assert_eq!(article.direction, "ltr");
        assert!(article.date_published.is_none());
    }

    #[test]
    fn test_negative_counts() {
        let article: Article = serde_json::from_str(
            r#"{"title": "t", "word_count": -1, "total_pages": -2, "rendered_pages": -3}"#,
        )
        .unwrap();

        assert_eq!(article.title, "t");
        assert_eq!(article.word_count, -1);
        assert_eq!(article.total_pages, -2);
        assert_eq!(article.rendered_pages, -3);
    }

    #[test]
    fn test_loose_value_rejects_other_json_types() {
        let result = serde_json::from_str::<Article>(r#"{"author": {"name": "x"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_loose_value_display() {
        assert_eq!(LooseValue::from("abc").to_string(), "abc");
        assert_eq!(LooseValue::from(7).to_string(), "7");
    }

    #[test]
    fn test_confidence_without_url() {
        let confidence: Confidence = serde_json::from_str(r#"{"confidence": 5.5}"#).unwrap();
        assert!((confidence.confidence - 5.5).abs() < f64::EPSILON);
        assert!(confidence.url.is_empty());
    }

    #[test]
    fn test_confidence_requires_score() {
        let result = serde_json::from_str::<Confidence>(r#"{"url": "http://www.example.com/"}"#);
        assert!(result.is_err());
    }
}
