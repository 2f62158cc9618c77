//! Command implementations shared by CLI and MCP server.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::corpus::audit::{self, Finding};
use crate::corpus::loader::CorpusLoader;
use crate::corpus::{Article, ArticleParagraph, Chapter, Recital};
use crate::repository::{self, LookupError};
use crate::store::{SnapshotSource, SnapshotStore};

/// Load the corpus named by `config`.
///
/// Any load error is fatal here: a command never runs against a partial
/// corpus.
///
/// # Errors
///
/// Returns an error if a data path is not configured or any document is
/// missing its ID.
pub fn open(config: &Config) -> anyhow::Result<SnapshotStore> {
    let paths = config.corpus_paths()?;
    info!(
        recitals = %paths.recitals.display(),
        chapters = %paths.chapters.display(),
        articles = %paths.articles.display(),
        "Loading GDPR corpus"
    );

    CorpusLoader::new(paths).load().map_err(|e| {
        let messages: Vec<String> = e.errors().iter().map(ToString::to_string).collect();
        anyhow::anyhow!("Failed to load corpus:\n  {}", messages.join("\n  "))
    })
}

#[must_use]
pub fn recital(source: &dyn SnapshotSource, id: &str) -> Option<Recital> {
    repository::recital_by_id(source, id)
}

#[must_use]
pub fn chapter(source: &dyn SnapshotSource, id: &str) -> Option<Chapter> {
    repository::chapter_by_id(source, id)
}

#[must_use]
pub fn article(source: &dyn SnapshotSource, id: &str) -> Option<Article> {
    repository::article_by_id(source, id)
}

/// Paragraph `index` of `article_id`.
///
/// # Errors
///
/// Returns [`LookupError::IndexOutOfRange`] for an index past the end of a
/// known article.
pub fn paragraph(
    source: &dyn SnapshotSource,
    article_id: &str,
    index: usize,
) -> Result<Option<ArticleParagraph>, LookupError> {
    repository::paragraph_by_article_id_and_index(source, article_id, index)
}

/// Number of loaded documents per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub recitals: usize,
    pub chapters: usize,
    pub articles: usize,
    /// Articles with at least one paragraph.
    pub articles_with_paragraphs: usize,
    pub paragraphs: usize,
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recitals:   {}", self.recitals)?;
        writeln!(f, "Chapters:   {}", self.chapters)?;
        writeln!(f, "Articles:   {}", self.articles)?;
        write!(
            f,
            "Paragraphs: {} (across {} article(s))",
            self.paragraphs, self.articles_with_paragraphs
        )
    }
}

#[must_use]
pub fn stats(source: &dyn SnapshotSource) -> CorpusStats {
    let paragraphs = source.article_paragraphs_snapshot();
    CorpusStats {
        recitals: source.recitals_snapshot().len(),
        chapters: source.chapters_snapshot().len(),
        articles: source.articles_snapshot().len(),
        articles_with_paragraphs: paragraphs.values().filter(|p| !p.is_empty()).count(),
        paragraphs: paragraphs.values().map(Vec::len).sum(),
    }
}

#[must_use]
pub fn check(source: &dyn SnapshotSource) -> Vec<Finding> {
    audit::audit(source)
}

/// Serialize a document for display.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(document: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_doc(article_id: &str) -> ArticleParagraph {
        ArticleParagraph {
            number: 1,
            article_id: article_id.to_string(),
            texts: vec!["text".to_string()],
        }
    }

    #[test]
    fn stats_counts_every_kind() {
        let store = SnapshotStore::new();
        store.insert_recital(Recital {
            id: "rec-1".to_string(),
            ..Recital::default()
        });
        store.insert_article(Article {
            id: "art-1".to_string(),
            ..Article::default()
        });
        store.push_paragraph(paragraph_doc("art-1"));
        store.push_paragraph(paragraph_doc("art-1"));
        store.push_paragraph(paragraph_doc("art-2"));

        let stats = stats(&store);
        assert_eq!(
            stats,
            CorpusStats {
                recitals: 1,
                chapters: 0,
                articles: 1,
                articles_with_paragraphs: 2,
                paragraphs: 3,
            }
        );
        assert!(stats.to_string().contains("Paragraphs: 3 (across 2 article(s))"));
    }

    #[test]
    fn open_requires_configured_paths() {
        let error = open(&Config::default()).unwrap_err();
        assert!(error.to_string().contains("missing data path"));
    }

    #[test]
    fn to_json_uses_wire_field_names() {
        let json = to_json(&Chapter {
            id: "chap-1".to_string(),
            article_ids: vec!["art-1".to_string()],
            ..Chapter::default()
        })
        .unwrap();
        assert!(json.contains("\"articles_ids\""));
    }
}
