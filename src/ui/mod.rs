pub mod panels;
pub mod plot;

use crate::state::{Action, Notice};

/// What the widgets produced during one frame. Actions go to the session;
/// notices come from UI-side work such as reading or saving files.
#[derive(Default)]
pub struct UiEvents {
    pub actions: Vec<Action>,
    pub notices: Vec<Notice>,
}

impl UiEvents {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.notices.is_empty()
    }
}
