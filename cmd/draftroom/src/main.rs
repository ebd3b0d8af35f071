//! # draftroom
//!
//! Console drafting tool. Typed lines become the draft body; `:`
//! commands drive the save and submission pipeline. Autosave runs in
//! the background the whole time, so walking away mid-sentence loses
//! nothing.

use auth_adapters::SessionIdentity;
use domains::{ArticleStore, CategoryId, Notice, Notifier, Severity, UserId};
use services::{AutosaveConfig, EditorSession, SaveOutcome};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prints notices straight to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => println!("· {} — {}", notice.title, notice.body),
            Severity::Error => eprintln!("! {} — {}", notice.title, notice.body),
        }
    }
}

#[cfg(feature = "db-sqlite")]
async fn open_store(config: &configs::AppConfig) -> anyhow::Result<Arc<dyn ArticleStore>> {
    use secrecy::ExposeSecret;
    let store =
        storage_adapters::SqliteArticleStore::connect(config.database.url.expose_secret()).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "db-sqlite"))]
async fn open_store(_config: &configs::AppConfig) -> anyhow::Result<Arc<dyn ArticleStore>> {
    Ok(Arc::new(storage_adapters::MemoryArticleStore::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = configs::AppConfig::load()?;
    let store = open_store(&config).await?;

    let identity = Arc::new(SessionIdentity::new());
    if let Some(user) = &config.identity.user {
        identity.sign_in(UserId(user.clone()));
    }

    let session = EditorSession::new(
        store,
        identity,
        Arc::new(ConsoleNotifier),
        AutosaveConfig {
            settle: config.autosave.settle(),
            interval: config.autosave.interval(),
            max_notices: config.autosave.max_notices,
        },
    );

    println!("draftroom — type to write, :help for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = line.strip_prefix(':') else {
            session.edit(|form| {
                if !form.content.is_empty() {
                    form.content.push('\n');
                }
                form.content.push_str(&line);
            });
            continue;
        };

        let (verb, rest) = match command.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command.trim(), ""),
        };
        match verb {
            "help" => {
                println!(":title <text>     set the headline");
                println!(":excerpt <text>   set the teaser");
                println!(":category <id>    assign a category");
                println!(":media <url>      attach cover media");
                println!(":save             save immediately");
                println!(":submit           send for review");
                println!(":status           show draft state");
                println!(":quit             leave without submitting");
            }
            "title" => session.edit(|form| form.title = rest.to_string()),
            "excerpt" => session.edit(|form| form.excerpt = rest.to_string()),
            "category" => session.edit(|form| form.category_id = Some(CategoryId(rest.to_string()))),
            "media" => session.edit(|form| form.media_url = Some(rest.to_string())),
            "save" => match session.save_now().await {
                Ok(SaveOutcome::Saved(id)) => info!(draft_id = %id, "manual save done"),
                Ok(SaveOutcome::Clean) => println!("nothing to save"),
                Ok(SaveOutcome::Skipped) => {}
                Err(err) => eprintln!("save failed: {err}"),
            },
            "submit" => {
                // Flush the latest keystrokes before finalizing.
                if let Err(err) = session.save_now().await {
                    eprintln!("cannot submit, save failed: {err}");
                    continue;
                }
                match session.submit().await {
                    Ok(receipt) => {
                        // Forward navigation: a submitted draft leaves
                        // the editor.
                        println!("submitted as {}", receipt.draft_id);
                        return Ok(());
                    }
                    Err(domains::DraftError::AlreadyInProgress) => {}
                    Err(err) => eprintln!("submission failed: {err}"),
                }
            }
            "status" => {
                let snapshot = session.snapshot();
                println!(
                    "draft {} · title {:?} · {} chars · {}",
                    session
                        .draft_id()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "(unsaved)".into()),
                    snapshot.title,
                    snapshot.content.len(),
                    if session.is_dirty() { "dirty" } else { "saved" },
                );
            }
            "quit" => break,
            other => eprintln!("unknown command :{other}"),
        }
    }

    Ok(())
}
