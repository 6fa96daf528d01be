//! WmContext: the explicit state every host function works against.
//!
//! Responsibilities (strict):
//! - Own the client registry, the focus slot, the cooperative flags and the display geometry.
//! - Apply script-requested mutations and forward them to the window manager core.
//! - Never hold the registry lock while the core is called: the core may re-enter
//!   and manage/unmanage clients, so every operation re-resolves its handle.

use crate::error::Result;
use crate::events::{Client, ClientKey, DisplayGeometry, Geometry, WindowId};
use crate::services::client_registry::ClientRegistry;
use crate::services::focus::FocusTracker;
use crate::services::handle::ClientHandle;
use crate::services::window_core::WindowCore;
use crate::utils::{saturating_i16, saturating_u16};
use crate::debug_if_enabled;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub struct WmContext {
    registry: RwLock<ClientRegistry>,
    focus: FocusTracker,
    stop: AtomicBool,
    trace_events: AtomicBool,
    display: DisplayGeometry,
    core: Arc<dyn WindowCore>,
}

impl WmContext {
    pub fn new(display: DisplayGeometry, core: Arc<dyn WindowCore>) -> Self {
        let DisplayGeometry {
            width,
            height,
            root,
        } = display;
        info!("Инициализация WmContext (экран {}x{}, root {})", width, height, root);
        Self {
            registry: RwLock::new(ClientRegistry::new()),
            focus: FocusTracker::new(),
            stop: AtomicBool::new(false),
            trace_events: AtomicBool::new(false),
            display,
            core,
        }
    }

    pub fn registry(&self) -> RwLockReadGuard<'_, ClientRegistry> {
        self.registry.read()
    }

    pub fn core(&self) -> &dyn WindowCore {
        self.core.as_ref()
    }

    pub fn display(&self) -> DisplayGeometry {
        self.display
    }

    // --- Жизненный цикл клиентов (вызывает ядро) ---

    pub fn manage(&self, window: WindowId, geometry: Geometry, border_width: u16) -> ClientKey {
        let key = self.registry.write().manage(window, geometry, border_width);
        debug_if_enabled!("Клиент {} добавлен: {}", window, geometry);
        key
    }

    pub fn unmanage(&self, key: ClientKey) -> Option<Client> {
        let client = self.registry.write().unmanage(key)?;
        self.focus.clear_if(key);
        debug_if_enabled!("Клиент {} удалён", client.window);
        Some(client)
    }

    // --- Геометрия ---

    /// Снимок клиента, на который указывает дескриптор
    pub fn client(&self, handle: &ClientHandle) -> Result<Client> {
        handle.resolve(&self.registry.read()).cloned()
    }

    pub fn move_client(&self, handle: &ClientHandle, x: i64, y: i64) -> Result<()> {
        let snapshot = self.mutate_geometry(handle, |geometry| {
            geometry.x = saturating_i16(x);
            geometry.y = saturating_i16(y);
        })?;
        self.core.update_geometry(&snapshot)
    }

    pub fn resize_client(&self, handle: &ClientHandle, width: i64, height: i64) -> Result<()> {
        let snapshot = self.mutate_geometry(handle, |geometry| {
            geometry.width = saturating_u16(width);
            geometry.height = saturating_u16(height);
        })?;
        self.core.update_geometry(&snapshot)
    }

    fn mutate_geometry(
        &self,
        handle: &ClientHandle,
        apply: impl FnOnce(&mut Geometry),
    ) -> Result<Client> {
        let mut registry = self.registry.write();
        let client = handle.resolve_mut(&mut registry)?;
        apply(&mut client.geometry);
        Ok(client.clone())
    }

    pub fn map_client(&self, handle: &ClientHandle) -> Result<()> {
        let snapshot = self.client(handle)?;
        self.core.make_visible(&snapshot)
    }

    // --- Фокус ---

    pub fn focused_client(&self) -> Option<ClientHandle> {
        self.focus.get(&self.registry.read())
    }

    pub fn focus_client(&self, handle: &ClientHandle) -> Result<()> {
        let snapshot = self.focus.set(&self.registry.read(), handle)?;
        self.core.draw_focus_indicator(&snapshot)
    }

    /// Фокус на голову списка. Пустой реестр - ничего не происходит.
    pub fn focus_default(&self) -> Result<Option<ClientHandle>> {
        let Some(snapshot) = self.focus.set_default(&self.registry.read()) else {
            return Ok(None);
        };
        self.core.draw_focus_indicator(&snapshot)?;
        Ok(self.focused_client())
    }

    // --- Флаги ---

    pub fn request_stop(&self) {
        info!("Скрипт запросил остановку оконного менеджера");
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn set_trace_events(&self, enabled: bool) {
        let old = self.trace_events.swap(enabled, Ordering::Relaxed);
        if old != enabled {
            info!("Трассировка событий: {}", if enabled { "включена" } else { "выключена" });
        }
    }

    pub fn trace_events(&self) -> bool {
        self.trace_events.load(Ordering::Relaxed)
    }
}
