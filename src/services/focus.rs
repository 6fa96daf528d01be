use crate::error::Result;
use crate::events::{Client, ClientKey};
use crate::services::client_registry::ClientRegistry;
use crate::services::handle::ClientHandle;
use parking_lot::RwLock;

/// Единственный слот "клиент в фокусе".
///
/// Слот хранит ключ арены, поэтому после удаления клиента из реестра
/// он читается как пустой, даже если ядро не вызвало `clear_if`.
#[derive(Debug, Default)]
pub struct FocusTracker {
    slot: RwLock<Option<ClientKey>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, registry: &ClientRegistry) -> Option<ClientHandle> {
        let key = (*self.slot.read())?;
        match registry.get(key) {
            Some(client) => Some(ClientHandle::wrap(key, client)),
            None => {
                self.clear_if(key);
                None
            }
        }
    }

    /// Явная фокусировка. Возвращает снимок клиента для перерисовки рамки.
    pub fn set(&self, registry: &ClientRegistry, handle: &ClientHandle) -> Result<Client> {
        let client = handle.resolve(registry)?.clone();
        *self.slot.write() = Some(handle.key());
        Ok(client)
    }

    /// Фокусировка "по умолчанию" - голова списка; пустой реестр ничего не меняет
    pub fn set_default(&self, registry: &ClientRegistry) -> Option<Client> {
        let head = registry.head()?;
        let client = registry.get(head)?.clone();
        *self.slot.write() = Some(head);
        Some(client)
    }

    pub fn clear_if(&self, key: ClientKey) {
        let mut slot = self.slot.write();
        if *slot == Some(key) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::events::Geometry;

    fn registry_with(windows: &[u32]) -> ClientRegistry {
        let mut registry = ClientRegistry::new();
        for &window in windows.iter().rev() {
            registry.manage(window, Geometry::default(), 1);
        }
        registry
    }

    fn handle_of(registry: &ClientRegistry, window: u32) -> ClientHandle {
        let key = registry.find_window(window).unwrap();
        ClientHandle::wrap(key, registry.get(key).unwrap())
    }

    #[test]
    fn test_get_after_set_returns_same_client() {
        let registry = registry_with(&[1, 2, 3]);
        let focus = FocusTracker::new();
        assert_eq!(focus.get(&registry), None);

        let b = handle_of(&registry, 2);
        let snapshot = focus.set(&registry, &b).unwrap();

        assert_eq!(snapshot.window, 2);
        assert_eq!(focus.get(&registry), Some(b));
    }

    #[test]
    fn test_default_focuses_head() {
        let registry = registry_with(&[4, 5]);
        let focus = FocusTracker::new();

        assert_eq!(focus.set_default(&registry).map(|c| c.window), Some(4));
        assert_eq!(focus.get(&registry).map(|h| h.window()), Some(4));
    }

    #[test]
    fn test_default_on_empty_registry_keeps_slot() {
        let registry = ClientRegistry::new();
        let focus = FocusTracker::new();
        assert!(focus.set_default(&registry).is_none());
        assert_eq!(focus.get(&registry), None);
    }

    #[test]
    fn test_unmanaged_focus_reads_empty() {
        let mut registry = registry_with(&[1, 2]);
        let focus = FocusTracker::new();
        let a = handle_of(&registry, 1);
        focus.set(&registry, &a).unwrap();

        registry.unmanage(a.key());

        assert_eq!(focus.get(&registry), None);
        assert!(matches!(
            focus.set(&registry, &a),
            Err(BridgeError::NotInRegistry(1))
        ));
    }

    #[test]
    fn test_clear_if_only_clears_matching_key() {
        let registry = registry_with(&[1, 2]);
        let focus = FocusTracker::new();
        let a = handle_of(&registry, 1);
        let b = handle_of(&registry, 2);
        focus.set(&registry, &a).unwrap();

        focus.clear_if(b.key());
        assert_eq!(focus.get(&registry), Some(a));

        focus.clear_if(a.key());
        assert_eq!(focus.get(&registry), None);
    }
}
