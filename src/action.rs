use crate::types::Page;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,
    Resize(u16, u16),
    Tick,

    // Pagination
    LoadNextPage,
    PageLoaded { offset: usize, page: Page },
    PageFailed { offset: usize, error: String },

    // Polish
    OpenArtwork,
    YankArtwork,

    None,
}

impl Action {
    /// Whether this came from a key press rather than the terminal or a
    /// background task.
    pub fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Action::None
                | Action::Tick
                | Action::Resize(..)
                | Action::LoadNextPage
                | Action::PageLoaded { .. }
                | Action::PageFailed { .. }
        )
    }
}
