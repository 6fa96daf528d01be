use crate::bridge_error;
use crate::error::Result;
use crate::events::{Client, WindowTree};
use crate::services::window_core::WindowCore;
use parking_lot::Mutex;
use std::io::Write;
use tracing::{error, warn};

/// Поток диагностики: строки из скриптов и дампы клиентов.
/// По умолчанию пишет в stderr.
pub struct DiagnosticSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl DiagnosticSink {
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Одна строка. Ошибка записи логируется и не доходит до скрипта.
    pub fn log(&self, message: &str) {
        if let Err(e) = self.write_block(&format!("{}\n", message)) {
            error!("Не удалось записать сообщение в диагностический поток: {}", e);
        }
    }

    /// Дамп клиента и его положения в дереве окон.
    /// Если запрос дерева не удался, вторая половина дампа не печатается.
    pub fn dump(&self, client: &Client, core: &dyn WindowCore) {
        if let Err(e) = self.write_block(&Self::format_client(client)) {
            error!("Не удалось записать дамп клиента {}: {}", client.window, e);
            return;
        }

        let tree = match core.query_window_tree(client.window) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Запрос дерева для окна {} не удался: {}", client.window, e);
                return;
            }
        };

        if let Err(e) = self.write_block(&Self::format_tree(&tree)) {
            error!("Не удалось записать дерево окна {}: {}", client.window, e);
        }
    }

    fn format_client(client: &Client) -> String {
        format!(
            "window: {}\nposition: ({}, {})\nsize: {} x {}\nborder width: {}\n",
            client.window,
            client.geometry.x,
            client.geometry.y,
            client.geometry.width,
            client.geometry.height,
            client.border_width
        )
    }

    fn format_tree(tree: &WindowTree) -> String {
        format!(
            "root: {}\nparent: {}\nchildren_len: {}\n",
            tree.root, tree.parent, tree.children_len
        )
    }

    fn write_block(&self, block: &str) -> Result<()> {
        let mut out = self.out.lock();
        out.write_all(block.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| bridge_error!(format, "{}", e))
    }
}
