use crate::bridge_error;
use crate::error::Result;
use crate::events::{Client, CoreCall, WindowId, WindowTree};
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::info;

use super::r#trait::WindowCore;

/// Ядро без дисплея: ничего не рисует, логирует и запоминает вызовы
pub struct DryRunCore {
    root: WindowId,
    calls: Mutex<Vec<CoreCall>>,
    failing_tree_queries: Mutex<HashSet<WindowId>>,
}

impl DryRunCore {
    pub fn new(root: WindowId) -> Self {
        info!("Dry-run режим - ядро оконного менеджера работает в режиме эмуляции");
        Self {
            root,
            calls: Mutex::new(Vec::new()),
            failing_tree_queries: Mutex::new(HashSet::new()),
        }
    }

    /// Запрос дерева для этого окна будет завершаться ошибкой
    pub fn fail_tree_query(&self, window: WindowId) {
        self.failing_tree_queries.lock().insert(window);
    }

    pub fn calls(&self) -> Vec<CoreCall> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, window: WindowId) -> Vec<CoreCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.window() == window)
            .cloned()
            .collect()
    }

    fn record(&self, call: CoreCall) {
        info!("[DRY RUN] {:?}", call);
        self.calls.lock().push(call);
    }
}

impl WindowCore for DryRunCore {
    fn update_geometry(&self, client: &Client) -> Result<()> {
        self.record(CoreCall::UpdateGeometry(client.window, client.geometry));
        Ok(())
    }

    fn make_visible(&self, client: &Client) -> Result<()> {
        self.record(CoreCall::MakeVisible(client.window));
        Ok(())
    }

    fn draw_focus_indicator(&self, client: &Client) -> Result<()> {
        self.record(CoreCall::DrawFocusIndicator(client.window));
        Ok(())
    }

    fn query_window_tree(&self, window: WindowId) -> Result<WindowTree> {
        self.record(CoreCall::QueryWindowTree(window));

        if self.failing_tree_queries.lock().contains(&window) {
            return Err(bridge_error!(collaborator, "query_tree для окна {} не удался", window));
        }

        Ok(WindowTree {
            root: self.root,
            parent: self.root,
            children_len: 0,
        })
    }
}
