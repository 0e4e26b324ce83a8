//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::FeedConfig;
use crate::detail::CharacterDetail;
use crate::download::AssetDownloader;
use crate::error::{Error, Result};
use crate::filter::{DisplayState, FilterView};
use crate::pagination::{LoadOutcome, PaginationController, PaginationState};
use crate::types::{format_tag, Item};
use serde_json::{json, Value};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Search {
                term,
                pages,
                all_categories,
            } => self.search(&config, term, *pages, *all_categories).await,
            Commands::Detail { id } => self.detail(&config, id).await,
            Commands::Download { url, name } => {
                self.download(&config, url, name.as_deref()).await
            }
        }
    }

    /// Load configuration, falling back to defaults when no file is given
    fn load_config(&self) -> Result<FeedConfig> {
        match &self.cli.config {
            Some(path) => FeedConfig::from_file(path),
            None => Ok(FeedConfig::default()),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    async fn search(
        &self,
        config: &FeedConfig,
        term: &str,
        pages: u32,
        all_categories: bool,
    ) -> Result<()> {
        let controller = config.controller(config.http_client()?);
        let filter = if all_categories {
            FilterView::allow_all()
        } else {
            config.filter_view()
        };

        let watcher = spawn_state_logger(&controller);

        let mut outcome = controller.on_search_submit(term).await;
        let mut loaded_pages = u32::from(outcome.is_applied());

        while loaded_pages < pages && outcome.is_applied() {
            outcome = controller.load_more().await;
            if outcome.is_applied() {
                loaded_pages += 1;
            }
        }

        let state = controller.snapshot();
        drop(controller);
        let _ = watcher.await;

        info!(
            term = %state.active_search_term,
            pages = loaded_pages,
            items = state.store.len(),
            "Search finished"
        );

        self.render_results(&state, &filter);

        match outcome {
            LoadOutcome::Failed(kind) => {
                let message = state
                    .last_error
                    .map(|e| e.message)
                    .unwrap_or_else(|| kind.to_string());
                Err(Error::Other(format!("Search failed ({kind}): {message}")))
            }
            _ => Ok(()),
        }
    }

    async fn detail(&self, config: &FeedConfig, raw_id: &str) -> Result<()> {
        let client = config.detail_client(config.http_client()?);
        let detail = client.fetch_param(raw_id).await?;

        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "DETAIL",
                "detail": detail,
            })),
            OutputFormat::Pretty => println!("{}", render_detail(&detail)),
        }
        Ok(())
    }

    async fn download(&self, config: &FeedConfig, url: &str, name: Option<&str>) -> Result<()> {
        let downloader = config.downloader()?;
        let path = downloader.download(url, name.unwrap_or("")).await?;

        match self.cli.format {
            OutputFormat::Json => self.output_message(&json!({
                "type": "DOWNLOAD",
                "url": url,
                "path": path.display().to_string(),
            })),
            OutputFormat::Pretty => println!("Saved {}", path.display()),
        }
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    fn render_results(&self, state: &PaginationState, filter: &FilterView) {
        let display = filter.display_state(state);

        match self.cli.format {
            OutputFormat::Json => {
                for item in filter.visible(&state.store) {
                    self.output_message(&json!({ "type": "ITEM", "item": item }));
                }
                self.output_message(&json!({
                    "type": "STATUS",
                    "status": {
                        "term": state.active_search_term,
                        "page": state.current_page,
                        "has_more": state.has_more,
                        "phase": state.phase(),
                        "total": state.store.len(),
                        "summary": describe_display(&display),
                        "error": state.last_error,
                    }
                }));
            }
            OutputFormat::Pretty => {
                for item in filter.visible(&state.store) {
                    println!("{}", render_item(item));
                }
                println!("{}", describe_display(&display));
                if state.loaded {
                    if let Some(error) = &state.last_error {
                        println!("Page {} failed: {}", error.page, error.message);
                    }
                }
            }
        }
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Log every state change until the controller is dropped
fn spawn_state_logger(controller: &PaginationController) -> tokio::task::JoinHandle<()> {
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update();
            debug!(
                phase = ?state.phase(),
                page = state.current_page,
                items = state.store.len(),
                has_more = state.has_more,
                "State changed"
            );
        }
    })
}

/// One line per item: id, category, name and tag captions
fn render_item(item: &Item) -> String {
    let mut line = format!("#{}", item.id);
    if let Some(category) = &item.category {
        line.push_str(&format!(" [{category}]"));
    }
    if let Some(name) = item.field_str("name") {
        line.push(' ');
        line.push_str(name);
    }
    let tags: Vec<String> = item.tags().into_iter().map(format_tag).collect();
    if !tags.is_empty() {
        line.push_str(&format!("  ({})", tags.join(", ")));
    }
    line
}

fn render_detail(detail: &CharacterDetail) -> String {
    let mut lines = vec![format!("{} (#{})", detail.name, detail.mal_id)];
    if let Some(kanji) = &detail.name_kanji {
        lines.push(kanji.clone());
    }
    if let Some(nicknames) = detail.nickname_line() {
        lines.push(nicknames);
    }
    lines.push(format!("Favorites: {}", detail.favorites));
    if let Some(about) = &detail.about {
        lines.push(String::new());
        lines.push(about.clone());
    }
    if let Some(url) = &detail.url {
        lines.push(url.clone());
    }
    lines.join("\n")
}

fn describe_display(display: &DisplayState) -> String {
    match display {
        DisplayState::Loading => "Loading...".to_string(),
        DisplayState::NotLoaded => "No search has been run".to_string(),
        DisplayState::Failed(message) => format!("Search failed: {message}"),
        DisplayState::NoResults => "No results".to_string(),
        DisplayState::AllFiltered { hidden } => {
            format!("All {hidden} results hidden by the category filter")
        }
        DisplayState::Items { visible, hidden: 0 } => format!("{visible} results"),
        DisplayState::Items { visible, hidden } => {
            format!("{visible} results ({hidden} hidden by the category filter)")
        }
    }
}
