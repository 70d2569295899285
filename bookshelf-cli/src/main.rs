use anyhow::{Context, Result};
use bookshelf_core::{Catalog, FileStore, Ingestor, NewBook, StagingArea};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf CLI - manage a book collection file offline")]
#[command(version)]
struct Cli {
    /// Collection file path
    #[arg(long, global = true, default_value = "books.json")]
    books: PathBuf,
    /// Staging directory for imported files
    #[arg(long, global = true, default_value = "uploads")]
    upload_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every book in the collection
    List {
        /// Print the collection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add one book
    Add {
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        isbn: String,
    },
    /// Import books from a CSV, XML, JSON or XLSX file
    Import {
        file: PathBuf,
    },
    /// Rename the first book with the given title
    Update {
        old_title: String,
        new_title: String,
    },
    /// Delete every book with the given title
    Delete {
        title: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = open_catalog(&cli.books)?;

    match cli.command {
        Commands::List { json } => list_books(&catalog, json),
        Commands::Add {
            title,
            author,
            isbn,
        } => add_book(&catalog, title, author, isbn),
        Commands::Import { file } => import_file(catalog, &cli.upload_dir, &file),
        Commands::Update {
            old_title,
            new_title,
        } => update_title(&catalog, &old_title, &new_title),
        Commands::Delete { title } => delete_books(&catalog, &title),
    }
}

fn open_catalog(books_path: &Path) -> Result<Arc<Catalog>> {
    let store = FileStore::new(books_path);
    store
        .initialize()
        .with_context(|| format!("Failed to open collection: {}", books_path.display()))?;
    Ok(Arc::new(Catalog::new(Arc::new(store))))
}

fn list_books(catalog: &Catalog, json: bool) -> Result<()> {
    let books = catalog.list_books().context("Failed to load collection")?;

    if json {
        let output =
            serde_json::to_string_pretty(&books).with_context(|| "Failed to serialize to JSON")?;
        println!("{}", output);
        return Ok(());
    }

    for book in &books {
        println!("{}\t{}\t{}", book.title, book.author, book.isbn);
    }
    println!("Total: {} books", books.len());
    Ok(())
}

fn add_book(catalog: &Catalog, title: String, author: String, isbn: String) -> Result<()> {
    let book = catalog
        .add_book(NewBook {
            title: Some(title),
            author: Some(author),
            isbn: Some(isbn),
        })
        .context("Failed to add book")?;

    println!("Added '{}'", book.title);
    Ok(())
}

/// Stage and ingest a local file exactly as an upload would be
fn import_file(catalog: Arc<Catalog>, upload_dir: &Path, file: &Path) -> Result<()> {
    let content =
        fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", file.display()))?;

    let ingestor = Ingestor::new(catalog, StagingArea::new(upload_dir));
    let report = ingestor
        .ingest(filename, &content)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!(
        "Imported {} books from {} ({} skipped)",
        report.imported, report.format, report.skipped
    );
    Ok(())
}

fn update_title(catalog: &Catalog, old_title: &str, new_title: &str) -> Result<()> {
    let renamed = catalog
        .update_title(old_title, new_title)
        .context("Failed to update title")?;

    if renamed {
        println!("Renamed '{}' to '{}'", old_title, new_title);
    } else {
        println!("No book titled '{}'", old_title);
    }
    Ok(())
}

fn delete_books(catalog: &Catalog, title: &str) -> Result<()> {
    let removed = catalog
        .delete_by_title(title)
        .context("Failed to delete books")?;

    println!("Deleted {} books titled '{}'", removed, title);
    Ok(())
}
