//! GDPR corpus documents and load errors.
//!
//! The corpus is four independent kinds of JSON documents. Every kind is
//! keyed by a string ID; paragraphs are keyed by the ID of the article that
//! owns them.

pub mod audit;
pub mod loader;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The four document kinds that make up a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKind {
    Recital,
    Chapter,
    Article,
    ArticleParagraph,
}

impl DocumentKind {
    /// Name of the field that identifies a document of this kind.
    #[must_use]
    pub fn id_field(self) -> &'static str {
        match self {
            Self::ArticleParagraph => "article ID",
            _ => "ID",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Recital => "recital",
            Self::Chapter => "chapter",
            Self::Article => "article",
            Self::ArticleParagraph => "paragraph",
        };
        f.write_str(name)
    }
}

/// A recital of the regulation (e.g. "rec-1").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recital {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub texts: Vec<String>,
}

/// A chapter grouping a list of articles (e.g. "chap-1").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roman: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Article IDs in chapter order. Not checked against loaded articles.
    #[serde(rename = "articles_ids", deserialize_with = "null_as_default")]
    pub article_ids: Vec<String>,
}

/// Article metadata, read from `art.json` (e.g. "art-1").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub roman: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Declared count; may disagree with the paragraphs actually loaded.
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_paragraphs: i64,
}

/// One paragraph of an article, read from a `para-*.json` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleParagraph {
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub article_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub texts: Vec<String>,
}

/// Decode an explicit `null` as the field's default, like an absent key.
///
/// A `"id": null` document then reaches the missing-ID check instead of
/// failing to parse.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A fatal error for one scan routine.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{kind} missing {} (path={})", .kind.id_field(), .path.display())]
    MissingId { kind: DocumentKind, path: PathBuf },
}

impl ScanError {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::MissingId { kind, .. } => *kind,
        }
    }
}

/// Errors reading a single document. Never fatal: the file is skipped.
#[derive(Debug, Error)]
pub(crate) enum DocumentError {
    #[error("failed to read: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every fatal error reported by a corpus load, one per failed routine.
#[derive(Debug)]
pub struct LoadError {
    errors: Vec<ScanError>,
}

impl LoadError {
    /// Combine routine errors, or `None` when there are none.
    ///
    /// Errors are ordered by kind so the message is stable across runs.
    #[must_use]
    pub fn combine(mut errors: Vec<ScanError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        errors.sort_by_key(ScanError::kind);
        Some(Self { errors })
    }

    #[must_use]
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_message_names_kind_and_path() {
        let error = ScanError::MissingId {
            kind: DocumentKind::Recital,
            path: PathBuf::from("/data/recitals/rec-bad.json"),
        };
        assert_eq!(
            error.to_string(),
            "recital missing ID (path=/data/recitals/rec-bad.json)"
        );
    }

    #[test]
    fn paragraph_message_names_article_id_field() {
        let error = ScanError::MissingId {
            kind: DocumentKind::ArticleParagraph,
            path: PathBuf::from("art-1/para-0.json"),
        };
        assert!(error.to_string().starts_with("paragraph missing article ID"));
    }

    #[test]
    fn combine_empty_is_none() {
        assert!(LoadError::combine(Vec::new()).is_none());
    }

    #[test]
    fn combine_orders_by_kind_one_per_line() {
        let combined = LoadError::combine(vec![
            ScanError::MissingId {
                kind: DocumentKind::Article,
                path: PathBuf::from("a/art.json"),
            },
            ScanError::MissingId {
                kind: DocumentKind::Recital,
                path: PathBuf::from("r.json"),
            },
        ])
        .unwrap();

        assert_eq!(combined.errors().len(), 2);
        assert_eq!(
            combined.to_string(),
            "recital missing ID (path=r.json)\narticle missing ID (path=a/art.json)"
        );
    }

    #[test]
    fn documents_tolerate_missing_fields() {
        let recital: Recital = serde_json::from_str(r#"{"number":1,"texts":["x"]}"#).unwrap();
        assert!(recital.id.is_empty());
        assert_eq!(recital.texts, vec!["x"]);

        let chapter: Chapter =
            serde_json::from_str(r#"{"id":"chap-1","articles_ids":["art-1","art-2"]}"#).unwrap();
        assert_eq!(chapter.article_ids, vec!["art-1", "art-2"]);
    }

    #[test]
    fn null_fields_decode_as_defaults() {
        let recital: Recital =
            serde_json::from_str(r#"{"id":null,"number":null,"texts":null}"#).unwrap();
        assert_eq!(recital, Recital::default());

        let chapter: Chapter = serde_json::from_str(
            r#"{"id":"chap-1","roman":null,"title":null,"articles_ids":null}"#,
        )
        .unwrap();
        assert_eq!(chapter.id, "chap-1");
        assert!(chapter.article_ids.is_empty());

        let paragraph: ArticleParagraph =
            serde_json::from_str(r#"{"article_id":null,"texts":["x"]}"#).unwrap();
        assert!(paragraph.article_id.is_empty());
    }

    #[test]
    fn numbers_may_be_negative() {
        let article: Article =
            serde_json::from_str(r#"{"id":"art-1","number":-1,"number_of_paragraphs":-3}"#)
                .unwrap();
        assert_eq!(article.number, -1);
        assert_eq!(article.number_of_paragraphs, -3);
    }

    #[test]
    fn keys_match_exactly() {
        let recital: Recital = serde_json::from_str(r#"{"ID":"rec-1","number":1}"#).unwrap();
        assert!(recital.id.is_empty());
        assert_eq!(recital.number, 1);
    }

    #[test]
    fn wrongly_typed_fields_are_rejected() {
        assert!(serde_json::from_str::<Chapter>(r#"{"id":7}"#).is_err());
        assert!(serde_json::from_str::<Recital>(r#"{"id":"rec-1","texts":"x"}"#).is_err());
    }
}
