pub mod keyboard;
pub mod window;

pub use keyboard::{KeyChord, KeyEvent};
pub use window::{Client, ClientKey, DisplayGeometry, Geometry, WindowId, WindowTree};

/// Вызов, который мост сделал в ядро оконного менеджера
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCall {
    UpdateGeometry(WindowId, Geometry),
    MakeVisible(WindowId),
    DrawFocusIndicator(WindowId),
    QueryWindowTree(WindowId),
}

impl CoreCall {
    pub fn window(&self) -> WindowId {
        match self {
            CoreCall::UpdateGeometry(window, _)
            | CoreCall::MakeVisible(window)
            | CoreCall::DrawFocusIndicator(window)
            | CoreCall::QueryWindowTree(window) => *window,
        }
    }
}
