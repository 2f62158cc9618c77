//! Corpus loader: scans the corpus directories and fills a [`SnapshotStore`].
//!
//! Layout on disk:
//!
//! ```text
//! recitals/*.json
//! chapters/*.json
//! articles/<article>/art.json
//! articles/<article>/para-*.json
//! ```
//!
//! The four kinds are scanned concurrently, one thread each. A routine stops
//! at the first document without its identifying field; the others keep
//! going, and whatever any routine inserted stays in the store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::corpus::{
    Article, ArticleParagraph, Chapter, DocumentError, DocumentKind, LoadError, Recital, ScanError,
};
use crate::store::SnapshotStore;

/// Article metadata file inside each article directory.
pub const ARTICLE_FILE_NAME: &str = "art.json";

/// Name prefix of paragraph files inside each article directory.
pub const PARAGRAPH_FILE_PREFIX: &str = "para-";

const JSON_EXTENSION: &str = "json";

/// Root directories of a corpus, one per location on disk.
///
/// Articles and their paragraphs share the `articles` root. Empty paths are
/// allowed and load as empty corpora.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusPaths {
    pub recitals: PathBuf,
    pub chapters: PathBuf,
    pub articles: PathBuf,
}

type ScanRoutine = fn(&CorpusLoader, &SnapshotStore) -> Result<usize, ScanError>;

/// Loads the corpus found under a set of [`CorpusPaths`].
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    paths: CorpusPaths,
}

impl CorpusLoader {
    #[must_use]
    pub fn new(paths: CorpusPaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &CorpusPaths {
        &self.paths
    }

    /// Load into a fresh store, failing if any routine failed.
    ///
    /// # Errors
    ///
    /// Returns the combined [`LoadError`] if any document is missing its ID.
    pub fn load(&self) -> Result<SnapshotStore, LoadError> {
        let store = SnapshotStore::new();
        self.load_into(&store)?;
        Ok(store)
    }

    /// Run the four scan routines concurrently against `store`.
    ///
    /// Every routine runs to completion or to its own fatal error. Data
    /// inserted before an error is kept, so the caller may still serve a
    /// partial corpus after inspecting the error.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] holding one entry per failed routine.
    pub fn load_into(&self, store: &SnapshotStore) -> Result<(), LoadError> {
        let routines: [(DocumentKind, ScanRoutine); 4] = [
            (DocumentKind::Recital, Self::scan_recitals),
            (DocumentKind::Chapter, Self::scan_chapters),
            (DocumentKind::Article, Self::scan_articles),
            (DocumentKind::ArticleParagraph, Self::scan_paragraphs),
        ];
        let errors = Mutex::new(Vec::new());

        thread::scope(|scope| {
            for (kind, routine) in routines {
                let errors = &errors;
                scope.spawn(move || match routine(self, store) {
                    Ok(count) => info!(%kind, count, "Loaded corpus documents"),
                    Err(e) => {
                        error!(%kind, error = %e, "Corpus scan aborted");
                        errors.lock().push(e);
                    }
                });
            }
        });

        match LoadError::combine(errors.into_inner()) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn scan_recitals(&self, store: &SnapshotStore) -> Result<usize, ScanError> {
        let mut count = 0;
        for path in json_files(&self.paths.recitals) {
            let Some(recital) = read_or_skip::<Recital>(DocumentKind::Recital, &path) else {
                continue;
            };
            if recital.id.is_empty() {
                return Err(missing_id(DocumentKind::Recital, path));
            }
            store.insert_recital(recital);
            count += 1;
        }
        Ok(count)
    }

    fn scan_chapters(&self, store: &SnapshotStore) -> Result<usize, ScanError> {
        let mut count = 0;
        for path in json_files(&self.paths.chapters) {
            let Some(chapter) = read_or_skip::<Chapter>(DocumentKind::Chapter, &path) else {
                continue;
            };
            if chapter.id.is_empty() {
                return Err(missing_id(DocumentKind::Chapter, path));
            }
            store.insert_chapter(chapter);
            count += 1;
        }
        Ok(count)
    }

    fn scan_articles(&self, store: &SnapshotStore) -> Result<usize, ScanError> {
        let mut count = 0;
        for dir in subdirectories(&self.paths.articles) {
            let path = dir.join(ARTICLE_FILE_NAME);
            let article = match read_document::<Article>(&path) {
                Ok(article) => article,
                Err(DocumentError::Read(e)) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(dir = %dir.display(), "Article directory has no art.json, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(
                        kind = %DocumentKind::Article,
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable document"
                    );
                    continue;
                }
            };
            if article.id.is_empty() {
                return Err(missing_id(DocumentKind::Article, path));
            }
            store.insert_article(article);
            count += 1;
        }
        Ok(count)
    }

    fn scan_paragraphs(&self, store: &SnapshotStore) -> Result<usize, ScanError> {
        let mut count = 0;
        for dir in subdirectories(&self.paths.articles) {
            for path in list_files(&dir).into_iter().filter(|p| is_paragraph_file(p)) {
                let Some(paragraph) =
                    read_or_skip::<ArticleParagraph>(DocumentKind::ArticleParagraph, &path)
                else {
                    continue;
                };
                if paragraph.article_id.is_empty() {
                    return Err(missing_id(DocumentKind::ArticleParagraph, path));
                }
                store.push_paragraph(paragraph);
                count += 1;
            }
        }
        Ok(count)
    }
}

fn missing_id(kind: DocumentKind, path: PathBuf) -> ScanError {
    ScanError::MissingId { kind, path }
}

/// Parse one JSON document.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Parse one JSON document, logging and returning `None` on failure.
fn read_or_skip<T: DeserializeOwned>(kind: DocumentKind, path: &Path) -> Option<T> {
    match read_document(path) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!(%kind, path = %path.display(), error = %e, "Skipping unreadable document");
            None
        }
    }
}

/// List a directory as `(path, is_dir)` pairs sorted by file name.
///
/// An unreadable directory is logged and treated as empty.
fn list_dir(dir: &Path) -> Vec<(PathBuf, bool)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                dir = %dir.display(),
                error = %e,
                "Cannot list corpus directory, treating it as empty"
            );
            return Vec::new();
        }
    };

    let mut listed: Vec<(PathBuf, bool)> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .map(|entry| {
            let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());
            (entry.path(), is_dir)
        })
        .collect();
    listed.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    listed
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    list_dir(dir)
        .into_iter()
        .filter_map(|(path, is_dir)| (!is_dir).then_some(path))
        .collect()
}

fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    list_dir(dir)
        .into_iter()
        .filter_map(|(path, is_dir)| is_dir.then_some(path))
        .collect()
}

fn json_files(dir: &Path) -> Vec<PathBuf> {
    list_files(dir).into_iter().filter(|p| has_json_extension(p)).collect()
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == JSON_EXTENSION)
}

fn is_paragraph_file(path: &Path) -> bool {
    has_json_extension(path)
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(PARAGRAPH_FILE_PREFIX))
}
