//! CLI interface for gdpr-corpus.
//!
//! Provides command-line argument parsing using clap.

use clap::{Parser, Subcommand};

/// Command-line interface for gdpr-corpus.
#[derive(Parser)]
#[command(name = "gdpr-corpus")]
#[command(author, version, about = "GDPR legal text corpus lookups", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show a recital by its ID (e.g., "rec-1").
    Recital {
        /// Recital ID.
        id: String,
    },

    /// Show a chapter by its ID (e.g., "chap-1").
    Chapter {
        /// Chapter ID.
        id: String,
    },

    /// Show an article by its ID (e.g., "art-1").
    Article {
        /// Article ID.
        id: String,
    },

    /// Show one paragraph of an article.
    Paragraph {
        /// Owning article ID (e.g., "art-1").
        article_id: String,

        /// Zero-based paragraph index, in load order.
        index: usize,
    },

    /// Count the loaded documents of each kind.
    Stats,

    /// Report inconsistencies between chapters, articles and paragraphs.
    Check,

    /// Start the MCP server for AI editor integration.
    #[cfg(feature = "mcp")]
    Serve,
}
