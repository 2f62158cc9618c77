use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gdpr_corpus::cli::{Cli, Commands};
use gdpr_corpus::commands;
use gdpr_corpus::config::Config;

fn main() -> anyhow::Result<()> {
    // stdout carries command output and the stdio MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::parse_from(["gdpr-corpus", "--help"]);
        return Ok(());
    };

    let config = Config::load()?;
    let store = commands::open(&config)?;

    match command {
        Commands::Recital { id } => print_document(commands::recital(&store, &id), "recital", &id),
        Commands::Chapter { id } => print_document(commands::chapter(&store, &id), "chapter", &id),
        Commands::Article { id } => print_document(commands::article(&store, &id), "article", &id),
        Commands::Paragraph { article_id, index } => {
            match commands::paragraph(&store, &article_id, index)? {
                Some(paragraph) => println!("{}", commands::to_json(&paragraph)?),
                None => println!("No paragraphs found for article '{article_id}'"),
            }
            Ok(())
        }
        Commands::Stats => {
            println!("{}", commands::stats(&store));
            Ok(())
        }
        Commands::Check => {
            let findings = commands::check(&store);
            if findings.is_empty() {
                println!("No issues found.");
            } else {
                for finding in &findings {
                    println!("- {finding}");
                }
                println!("{} issue(s) found", findings.len());
            }
            Ok(())
        }
        #[cfg(feature = "mcp")]
        Commands::Serve => tokio::runtime::Runtime::new()?
            .block_on(gdpr_corpus::mcp::serve(store, config.server.name)),
    }
}

fn print_document<T: Serialize>(document: Option<T>, kind: &str, id: &str) -> anyhow::Result<()> {
    match document {
        Some(document) => println!("{}", commands::to_json(&document)?),
        None => println!("No {kind} found with ID '{id}'"),
    }
    Ok(())
}
