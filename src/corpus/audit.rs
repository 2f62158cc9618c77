//! Cross-kind consistency report.
//!
//! Loading never checks references between kinds. This module looks at a
//! loaded corpus after the fact and lists what does not line up.

use std::fmt;

use crate::store::SnapshotSource;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Finding {
    /// `number_of_paragraphs` disagrees with the paragraph files found.
    ParagraphCountMismatch {
        article_id: String,
        declared: i64,
        loaded: usize,
    },
    /// A chapter lists an article that was not loaded.
    DanglingChapterArticle {
        chapter_id: String,
        article_id: String,
    },
    /// Paragraphs reference an article that has no `art.json`.
    OrphanParagraphs { article_id: String, count: usize },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParagraphCountMismatch {
                article_id,
                declared,
                loaded,
            } => write!(
                f,
                "article {article_id} declares {declared} paragraph(s) but {loaded} were loaded"
            ),
            Self::DanglingChapterArticle {
                chapter_id,
                article_id,
            } => write!(f, "chapter {chapter_id} lists unknown article {article_id}"),
            Self::OrphanParagraphs { article_id, count } => write!(
                f,
                "{count} paragraph(s) belong to article {article_id}, which was not loaded"
            ),
        }
    }
}

/// Compare the kinds of a loaded corpus against each other.
///
/// Findings come back sorted so repeated runs print the same report.
#[must_use]
pub fn audit(source: &dyn SnapshotSource) -> Vec<Finding> {
    let chapters = source.chapters_snapshot();
    let articles = source.articles_snapshot();
    let paragraphs = source.article_paragraphs_snapshot();
    let mut findings = Vec::new();

    for article in articles.values() {
        let loaded = paragraphs.get(&article.id).map_or(0, Vec::len);
        if usize::try_from(article.number_of_paragraphs).ok() != Some(loaded) {
            findings.push(Finding::ParagraphCountMismatch {
                article_id: article.id.clone(),
                declared: article.number_of_paragraphs,
                loaded,
            });
        }
    }

    for chapter in chapters.values() {
        for article_id in &chapter.article_ids {
            if !articles.contains_key(article_id) {
                findings.push(Finding::DanglingChapterArticle {
                    chapter_id: chapter.id.clone(),
                    article_id: article_id.clone(),
                });
            }
        }
    }

    for (article_id, list) in &paragraphs {
        if !articles.contains_key(article_id) {
            findings.push(Finding::OrphanParagraphs {
                article_id: article_id.clone(),
                count: list.len(),
            });
        }
    }

    findings.sort();
    findings
}
