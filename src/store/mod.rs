//! Snapshot store holding the loaded corpus indexes.
//!
//! Readers never see the indexes themselves: every accessor clones the
//! requested index under a shared read lock and hands back the copy.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::corpus::{Article, ArticleParagraph, Chapter, Recital};

/// Read access to corpus snapshots.
///
/// Lookups are written against this trait so they can run on top of any
/// snapshot provider, not only a loaded [`SnapshotStore`].
pub trait SnapshotSource: Send + Sync {
    /// Copy of every recital, keyed by recital ID.
    fn recitals_snapshot(&self) -> HashMap<String, Recital>;

    /// Copy of every chapter, keyed by chapter ID.
    fn chapters_snapshot(&self) -> HashMap<String, Chapter>;

    /// Copy of every article, keyed by article ID.
    fn articles_snapshot(&self) -> HashMap<String, Article>;

    /// Copy of every paragraph sequence, keyed by owning article ID.
    ///
    /// Each sequence is in load order.
    fn article_paragraphs_snapshot(&self) -> HashMap<String, Vec<ArticleParagraph>>;
}

#[derive(Debug, Default)]
struct Indexes {
    recitals: HashMap<String, Recital>,
    chapters: HashMap<String, Chapter>,
    articles: HashMap<String, Article>,
    paragraphs: HashMap<String, Vec<ArticleParagraph>>,
}

/// The four corpus indexes behind one reader/writer lock.
///
/// Writes only happen while a [`CorpusLoader`](crate::corpus::loader::CorpusLoader)
/// populates the store; after that every access is a read.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    indexes: RwLock<Indexes>,
}

impl SnapshotStore {
    /// Create a store with four empty indexes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a recital, replacing any earlier one with the same ID.
    pub(crate) fn insert_recital(&self, recital: Recital) {
        let id = recital.id.clone();
        if self.indexes.write().recitals.insert(id.clone(), recital).is_some() {
            debug!(%id, "Duplicate recital ID, keeping the later document");
        }
    }

    /// Insert a chapter, replacing any earlier one with the same ID.
    pub(crate) fn insert_chapter(&self, chapter: Chapter) {
        let id = chapter.id.clone();
        if self.indexes.write().chapters.insert(id.clone(), chapter).is_some() {
            debug!(%id, "Duplicate chapter ID, keeping the later document");
        }
    }

    /// Insert an article, replacing any earlier one with the same ID.
    pub(crate) fn insert_article(&self, article: Article) {
        let id = article.id.clone();
        if self.indexes.write().articles.insert(id.clone(), article).is_some() {
            debug!(%id, "Duplicate article ID, keeping the later document");
        }
    }

    /// Append a paragraph to its owning article's sequence.
    pub(crate) fn push_paragraph(&self, paragraph: ArticleParagraph) {
        self.indexes
            .write()
            .paragraphs
            .entry(paragraph.article_id.clone())
            .or_default()
            .push(paragraph);
    }
}

impl SnapshotSource for SnapshotStore {
    fn recitals_snapshot(&self) -> HashMap<String, Recital> {
        self.indexes.read().recitals.clone()
    }

    fn chapters_snapshot(&self) -> HashMap<String, Chapter> {
        self.indexes.read().chapters.clone()
    }

    fn articles_snapshot(&self) -> HashMap<String, Article> {
        self.indexes.read().articles.clone()
    }

    fn article_paragraphs_snapshot(&self) -> HashMap<String, Vec<ArticleParagraph>> {
        self.indexes.read().paragraphs.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn recital(id: &str, text: &str) -> Recital {
        Recital {
            id: id.to_string(),
            number: 1,
            texts: vec![text.to_string()],
        }
    }

    fn paragraph(article_id: &str, number: i64) -> ArticleParagraph {
        ArticleParagraph {
            number,
            article_id: article_id.to_string(),
            texts: vec![format!("paragraph {number}")],
        }
    }

    #[test]
    fn new_store_is_empty() {
        let store = SnapshotStore::new();
        assert!(store.recitals_snapshot().is_empty());
        assert!(store.chapters_snapshot().is_empty());
        assert!(store.articles_snapshot().is_empty());
        assert!(store.article_paragraphs_snapshot().is_empty());
    }

    #[test]
    fn later_insert_overwrites_same_id() {
        let store = SnapshotStore::new();
        store.insert_recital(recital("rec-1", "first"));
        store.insert_recital(recital("rec-1", "second"));

        let recitals = store.recitals_snapshot();
        assert_eq!(recitals.len(), 1);
        assert_eq!(recitals["rec-1"].texts, vec!["second"]);
    }

    #[test]
    fn paragraphs_keep_insertion_order() {
        let store = SnapshotStore::new();
        store.push_paragraph(paragraph("art-1", 2));
        store.push_paragraph(paragraph("art-1", 1));
        store.push_paragraph(paragraph("art-2", 1));

        let paragraphs = store.article_paragraphs_snapshot();
        let numbers: Vec<i64> = paragraphs["art-1"].iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![2, 1]);
        assert_eq!(paragraphs["art-2"].len(), 1);
    }

    #[test]
    fn mutating_a_snapshot_does_not_touch_the_store() {
        let store = SnapshotStore::new();
        store.insert_recital(recital("rec-1", "original"));
        store.push_paragraph(paragraph("art-1", 1));

        let mut recitals = store.recitals_snapshot();
        recitals.get_mut("rec-1").unwrap().texts.push("added".to_string());
        recitals.insert("rec-2".to_string(), recital("rec-2", "new"));

        let mut paragraphs = store.article_paragraphs_snapshot();
        paragraphs.get_mut("art-1").unwrap()[0].texts.clear();
        paragraphs.get_mut("art-1").unwrap().push(paragraph("art-1", 2));

        let recitals = store.recitals_snapshot();
        assert_eq!(recitals.len(), 1);
        assert_eq!(recitals["rec-1"].texts, vec!["original"]);

        let paragraphs = store.article_paragraphs_snapshot();
        assert_eq!(paragraphs["art-1"].len(), 1);
        assert_eq!(paragraphs["art-1"][0].texts, vec!["paragraph 1"]);
    }

    #[test]
    fn concurrent_readers_see_complete_indexes() {
        let store = Arc::new(SnapshotStore::new());
        for n in 0..50 {
            store.insert_recital(recital(&format!("rec-{n}"), "text"));
        }

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(store.recitals_snapshot().len(), 50);
                    }
                })
            })
            .collect();

        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn readers_never_observe_a_partial_paragraph_append() {
        let store = Arc::new(SnapshotStore::new());

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..200 {
                    store.push_paragraph(paragraph("art-1", n));
                }
            })
        };

        let mut last_len = 0;
        for _ in 0..200 {
            let len = store
                .article_paragraphs_snapshot()
                .get("art-1")
                .map_or(0, Vec::len);
            assert!(len >= last_len, "snapshot went backwards");
            last_len = len;
        }

        writer.join().unwrap();
        assert_eq!(store.article_paragraphs_snapshot()["art-1"].len(), 200);
    }
}
