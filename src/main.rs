use clap::Parser;
use iced::{Element, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::HashSet;
use std::path::PathBuf;

mod config;
mod error;
mod host;
mod state;
mod ui;

use config::PanelConfig;
use host::{CatalogResponse, HostCommand, HostEvent, LocalHost};
use state::PanelState;

/// Browse every image in a project, grouped by directory
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
struct Args {
    /// Project root to catalog (defaults to current directory)
    #[arg(value_name = "PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// File or directory the panel was opened for
    #[arg(long, value_name = "PATH")]
    focus: Option<String>,

    /// Config file (defaults to <config_dir>/preview-images/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read host events (e.g. RevealFocus) as JSON lines from stdin
    #[arg(long)]
    stdin_events: bool,
}

/// Main application state
struct PreviewImages {
    /// Everything the panel derives from the catalog
    panel: PanelState,
    /// Transport to the catalog provider
    host: LocalHost,
    /// Thumbnails already fetched, kept on screen while scrolling
    loaded: HashSet<String>,
    stdin_events: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Reload" (or "Retry")
    Refresh,
    /// Catalog request finished
    CatalogLoaded(Result<CatalogResponse, String>),
    /// User clicked "Open Project"
    OpenProject,
    /// Pushed by the host
    Host(HostEvent),
    KeywordChanged(String),
    TypeToggled(String, bool),
    ClearScope,
    ToggleGroup(String),
    ExpandAll,
    CollapseAll,
    SizeDragged(u16),
    SizeReleased,
    BackgroundSelected(usize),
    Scrolled,
    /// Scroll debounce timer fired for this ticket
    ScrollSettled(u64),
    /// Reveal a catalog directory in the system file browser
    OpenFolder(String),
    Preview(String),
    ClosePreview,
    /// Remove a record from the in-memory catalog
    Remove(String),
}

impl PreviewImages {
    /// Create a new instance of the application and request the catalog
    fn new(args: Args, config: PanelConfig) -> (Self, Task<Message>) {
        let root = args
            .project_root
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let host = LocalHost::new(root, config.image_extensions.clone(), config.provider_timeout());
        let panel = PanelState::new(config, args.focus);

        log::info!("🎨 Image preview panel for {}", host.root().display());

        let mut app = PreviewImages {
            panel,
            host,
            loaded: HashSet::new(),
            stdin_events: args.stdin_events,
        };
        let task = app.refresh();
        (app, task)
    }

    /// Request a fresh catalog. In-flight requests are not cancelled;
    /// whichever response arrives last wins.
    fn refresh(&mut self) -> Task<Message> {
        // Keep the current catalog on screen while loading
        self.panel.begin_refresh();
        if let Ok(json) = HostCommand::GetAllImages.to_json() {
            log::debug!("→ host: {json}");
        }

        // Launch async catalog request
        Task::perform(self.host.clone().get_all_images(), |result| {
            Message::CatalogLoaded(result.map_err(|e| e.to_string()))
        })
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Refresh => self.refresh(),
            Message::CatalogLoaded(Ok(response)) => {
                // Thumbnails of the old snapshot may be gone
                self.loaded.clear();
                self.panel.apply_catalog(response.images, &response.project_root);
                log::info!(
                    "📚 Catalog v{} ready: {} of {} images shown",
                    self.panel.view_version(),
                    self.panel.visible_count(),
                    self.panel.total_count()
                );
                Task::none()
            }
            Message::CatalogLoaded(Err(error)) => {
                // Surface the failure instead of loading forever
                self.panel.refresh_failed(error);
                Task::none()
            }
            Message::OpenProject => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Project Folder")
                    .set_directory(self.host.root())
                    .pick_folder();

                match folder {
                    Some(root) => {
                        // Point the provider at the new root and fetch its catalog
                        let config = self.panel.config();
                        self.host =
                            LocalHost::new(root, config.image_extensions.clone(), config.provider_timeout());
                        self.refresh()
                    }
                    None => Task::none(),
                }
            }
            Message::Host(HostEvent::RevealFocus { path }) => {
                // May rescope and arm one auto-preview
                self.panel.focus_event(&path);
                Task::none()
            }
            Message::KeywordChanged(keyword) => {
                self.panel.set_keyword(keyword);
                Task::none()
            }
            Message::TypeToggled(extension, enabled) => {
                self.panel.set_type_enabled(&extension, enabled);
                Task::none()
            }
            Message::ClearScope => {
                self.panel.clear_scope();
                Task::none()
            }
            Message::ToggleGroup(key) => {
                self.panel.toggle_group(&key);
                Task::none()
            }
            Message::ExpandAll => {
                self.panel.expand_all();
                Task::none()
            }
            Message::CollapseAll => {
                self.panel.collapse_all();
                Task::none()
            }
            Message::SizeDragged(value) => {
                // Large catalogs defer the value until release
                self.panel.drag_size(value);
                Task::none()
            }
            Message::SizeReleased => {
                self.panel.release_size();
                Task::none()
            }
            Message::BackgroundSelected(index) => {
                self.panel.select_background(index);
                Task::none()
            }
            Message::Scrolled => {
                // Mark scrolling and schedule the trailing debounce
                let ticket = self.panel.scrolled();
                let wait = self.panel.scroll_wait();
                Task::perform(tokio::time::sleep(wait), move |_| Message::ScrollSettled(ticket))
            }
            Message::ScrollSettled(ticket) => {
                // Stale tickets are ignored
                self.panel.scroll_settled(ticket);
                Task::none()
            }
            Message::OpenFolder(directory) => {
                // Fire and forget; failures are only logged
                let command = HostCommand::OpenContainingFolder { path: directory };
                if let Err(e) = self.host.send(&command) {
                    log::warn!("⚠️  {e}");
                }
                Task::none()
            }
            Message::Preview(full_path) => {
                self.panel.open_preview(&full_path);
                Task::none()
            }
            Message::ClosePreview => {
                self.panel.close_preview();
                Task::none()
            }
            Message::Remove(full_path) => {
                // Already-absent records are a no-op
                self.panel.remove_record(&full_path);
                self.loaded.remove(&full_path);
                Task::none()
            }
        };

        // The renderer consumes the pending auto-preview once it is on screen
        self.panel.take_auto_preview();

        if !self.panel.is_scrolling() {
            self.mark_loaded();
        }

        task
    }

    /// Remember which thumbnails were fetched while scrolling was idle
    fn mark_loaded(&mut self) {
        for group in self.panel.groups().into_iter().filter(|g| g.expanded) {
            self.loaded
                .extend(group.records.iter().map(|r| r.full_path.clone()));
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        ui::panel(&self.panel, &self.loaded)
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.stdin_events {
            Subscription::run(host::stdin::events).map(Message::Host)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = PanelConfig::load(args.config.as_deref());

    iced::application("Preview Images", PreviewImages::update, PreviewImages::view)
        .subscription(PreviewImages::subscription)
        .theme(PreviewImages::theme)
        .centered()
        .run_with(move || PreviewImages::new(args.clone(), config.clone()))
}
