use crate::error::Result;
use crate::events::{Client, WindowId, WindowTree};

/// Операции ядра оконного менеджера, которые вызывает мост
pub trait WindowCore: Send + Sync {
    /// Применить геометрию клиента к окну
    fn update_geometry(&self, client: &Client) -> Result<()>;

    /// Показать окно клиента
    fn make_visible(&self, client: &Client) -> Result<()>;

    /// Перерисовать рамку фокуса
    fn draw_focus_indicator(&self, client: &Client) -> Result<()>;

    /// Запросить root/parent/число детей окна
    fn query_window_tree(&self, window: WindowId) -> Result<WindowTree>;
}
