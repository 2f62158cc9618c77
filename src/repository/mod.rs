//! Point lookups on top of corpus snapshots.
//!
//! An unknown ID is an empty result, never an error. The only failure is
//! asking for a paragraph index past the end of an article.

use std::collections::HashMap;

use thiserror::Error;

use crate::corpus::{Article, ArticleParagraph, Chapter, Recital};
use crate::store::SnapshotSource;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("index out of range: article {article_id} has {len} paragraph(s), requested index {index}")]
    IndexOutOfRange {
        article_id: String,
        index: usize,
        len: usize,
    },
}

#[must_use]
pub fn recital_by_id(source: &dyn SnapshotSource, id: &str) -> Option<Recital> {
    source.recitals_snapshot().remove(id)
}

#[must_use]
pub fn chapter_by_id(source: &dyn SnapshotSource, id: &str) -> Option<Chapter> {
    source.chapters_snapshot().remove(id)
}

#[must_use]
pub fn article_by_id(source: &dyn SnapshotSource, id: &str) -> Option<Article> {
    source.articles_snapshot().remove(id)
}

/// Paragraph `index` (zero-based, load order) of article `article_id`.
///
/// # Errors
///
/// Returns [`LookupError::IndexOutOfRange`] if the article exists but has
/// no paragraph at `index`.
pub fn paragraph_by_article_id_and_index(
    source: &dyn SnapshotSource,
    article_id: &str,
    index: usize,
) -> Result<Option<ArticleParagraph>, LookupError> {
    paragraph_at(&source.article_paragraphs_snapshot(), article_id, index)
}

/// Bounds-checked paragraph lookup over an already taken snapshot.
///
/// # Errors
///
/// Returns [`LookupError::IndexOutOfRange`] if `article_id` is present but
/// `index` is not below its paragraph count.
pub fn paragraph_at(
    snapshot: &HashMap<String, Vec<ArticleParagraph>>,
    article_id: &str,
    index: usize,
) -> Result<Option<ArticleParagraph>, LookupError> {
    let Some(paragraphs) = snapshot.get(article_id) else {
        return Ok(None);
    };

    paragraphs
        .get(index)
        .cloned()
        .map(Some)
        .ok_or_else(|| LookupError::IndexOutOfRange {
            article_id: article_id.to_string(),
            index,
            len: paragraphs.len(),
        })
}
