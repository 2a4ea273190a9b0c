use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::controller::Controller;
use crate::error::DexError;
use crate::event::Event;
use crate::fetcher::PageFetcher;
use crate::grid::GridViewport;
use crate::trigger::{ScrollTrigger, Sentinel};
use crate::types::{DetailRecord, PageRequest};

pub struct App {
    pub controller: Controller,
    pub trigger: ScrollTrigger,
    pub grid: GridViewport,
    /// Card under the keyboard cursor
    pub highlight: usize,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    /// Spinner frame counter
    pub ticks: usize,
    fetcher: PageFetcher,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        fetcher: PageFetcher,
        page_size: usize,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let mut trigger = ScrollTrigger::new();
        let signal_tx = action_tx.clone();
        trigger.on_signal(move |_| {
            signal_tx.send(Action::LoadNextPage).ok();
        });

        Self {
            controller: Controller::new(page_size),
            trigger,
            grid: GridViewport::default(),
            highlight: 0,
            notice: None,
            error: None,
            should_quit: false,
            ticks: 0,
            fetcher,
            action_tx,
        }
    }

    pub fn catalog_name(&self) -> &str {
        self.fetcher.catalog_name()
    }

    pub fn dialog_open(&self) -> bool {
        self.controller.selection().is_some()
    }

    /// Record the user is acting on: the open dialog, else the highlight.
    pub fn focused(&self) -> Option<&DetailRecord> {
        self.controller
            .selection()
            .or_else(|| self.controller.collection().get(self.highlight))
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadNextPage,
            Event::Tick => Action::Tick,
            Event::Resize(w, h) => Action::Resize(w, h),
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.dialog_open() {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => Action::Back,
                KeyCode::Char('o') => Action::OpenArtwork,
                KeyCode::Char('y') => Action::YankArtwork,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('h') | KeyCode::Left => Action::ScrollLeft,
            KeyCode::Char('l') | KeyCode::Right => Action::ScrollRight,
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::PageDown
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('o') => Action::OpenArtwork,
            KeyCode::Char('y') => Action::YankArtwork,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if action.is_user_initiated() {
            self.notice = None;
            self.error = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => {
                if self.dialog_open() {
                    self.controller.dismiss();
                } else {
                    self.should_quit = true;
                }
            }
            Action::ScrollUp => self.move_highlight(-(self.grid.columns as isize)),
            Action::ScrollDown => self.move_highlight(self.grid.columns as isize),
            Action::ScrollLeft => self.move_highlight(-1),
            Action::ScrollRight => self.move_highlight(1),
            Action::PageUp => self.move_highlight(-(self.grid.capacity() as isize)),
            Action::PageDown => self.move_highlight(self.grid.capacity() as isize),
            Action::GoToTop => self.move_highlight(isize::MIN),
            Action::GoToBottom => self.move_highlight(isize::MAX),
            Action::Select => {
                self.controller.select(self.highlight);
            }
            Action::Resize(w, h) => {
                self.grid.resize(w, h);
                self.grid.scroll_to(self.highlight);
            }
            Action::Tick => {
                self.ticks = self.ticks.wrapping_add(1);
            }

            // Pagination
            Action::LoadNextPage => {
                if let Some(request) = self.controller.begin_page() {
                    self.spawn_fetch_page(request);
                }
            }
            Action::PageLoaded { offset, page } => {
                self.controller.commit_page(offset, page);
                self.trigger.resume();
            }
            Action::PageFailed { offset, error } => {
                self.controller.fail_page(offset, error);
                self.trigger.resume();
            }

            // Polish
            Action::OpenArtwork => {
                if let Some(url) = self.focused_artwork() {
                    match open::that(&url) {
                        Ok(()) => self.notice = Some("Opened artwork".to_string()),
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
            }
            Action::YankArtwork => {
                if let Some(url) = self.focused_artwork() {
                    match copy_to_clipboard(&url) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
            }

            Action::None => {}
        }

        self.sync_trigger();
    }

    fn focused_artwork(&mut self) -> Option<String> {
        let record = self.focused()?;
        if record.has_artwork() {
            Some(record.image_uri.clone())
        } else {
            self.notice = Some(format!("{} has no artwork", record.name));
            None
        }
    }

    fn move_highlight(&mut self, delta: isize) {
        let len = self.controller.collection().len();
        if len == 0 || self.dialog_open() {
            return;
        }
        let target = self.highlight.saturating_add_signed(delta);
        self.highlight = target.min(len - 1);
        self.grid.scroll_to(self.highlight);

        // When every card fits on screen the last one never leaves view,
        // so moving onto it is the only way to ask for the next page again.
        if self.highlight == len - 1 {
            self.trigger.revisit(Sentinel(len - 1));
        }
    }

    /// Point the trigger at the last card and report what is on screen.
    fn sync_trigger(&mut self) {
        let len = self.controller.collection().len();
        let Some(last) = len.checked_sub(1) else {
            return;
        };
        self.trigger
            .attach(Sentinel(last), self.controller.is_loading());
        self.trigger.observe(&self.grid.visible_range(len));
    }

    fn spawn_fetch_page(&self, request: PageRequest) {
        let tx = self.action_tx.clone();
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            let offset = request.offset;
            match fetcher.fetch_page(offset, request.limit).await {
                Ok(page) => {
                    tx.send(Action::PageLoaded { offset, page }).ok();
                }
                Err(e) => {
                    tx.send(Action::PageFailed {
                        offset,
                        error: e.to_string(),
                    })
                    .ok();
                }
            }
        });
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), DexError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| DexError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| DexError::Clipboard(e.to_string()))
}
