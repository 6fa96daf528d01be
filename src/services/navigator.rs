use crate::bridge_error;
use crate::error::{BridgeError, Result};
use crate::events::ClientKey;
use crate::services::client_registry::ClientRegistry;
use crate::services::handle::ClientHandle;

/// Обход списка клиентов для скриптов.
/// `next` и `prev` замкнуты в кольцо: за последним клиентом идёт голова,
/// перед головой стоит последний.
pub struct ListNavigator;

impl ListNavigator {
    pub fn count(registry: &ClientRegistry) -> usize {
        registry.len()
    }

    /// Свежий снимок списка, голова первой
    pub fn all_handles(registry: &ClientRegistry) -> Vec<ClientHandle> {
        registry
            .iter()
            .map(|(key, client)| ClientHandle::wrap(key, client))
            .collect()
    }

    pub fn first(registry: &ClientRegistry) -> Result<ClientHandle> {
        let head = registry.head().ok_or(BridgeError::EmptyRegistry)?;
        Self::wrap_key(registry, head)
    }

    pub fn next(registry: &ClientRegistry, handle: &ClientHandle) -> Result<ClientHandle> {
        let client = handle.resolve(registry)?;
        match client.next() {
            Some(next) => Self::wrap_key(registry, next),
            None => Self::first(registry),
        }
    }

    /// Линейный поиск предшественника от головы, O(позиция в списке)
    pub fn prev(registry: &ClientRegistry, handle: &ClientHandle) -> Result<ClientHandle> {
        handle.resolve(registry)?;

        let mut last = None;
        for key in registry.keys() {
            if registry.next_of(key) == Some(handle.key()) {
                return Self::wrap_key(registry, key);
            }
            last = Some(key);
        }

        // Предшественника нет - это голова, переходим на конец списка
        let last = last.ok_or(BridgeError::EmptyRegistry)?;
        Self::wrap_key(registry, last)
    }

    fn wrap_key(registry: &ClientRegistry, key: ClientKey) -> Result<ClientHandle> {
        registry
            .get(key)
            .map(|client| ClientHandle::wrap(key, client))
            .ok_or_else(|| bridge_error!(collaborator, "разорванная цепочка клиентов"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Geometry, WindowId};

    /// Реестр A(1) -> B(2) -> C(3)
    fn abc() -> ClientRegistry {
        let mut registry = ClientRegistry::new();
        for window in [3, 2, 1] {
            registry.manage(window, Geometry::default(), 1);
        }
        registry
    }

    fn window(handle: &ClientHandle) -> WindowId {
        handle.window()
    }

    #[test]
    fn test_scenario_abc() {
        let registry = abc();

        let a = ListNavigator::first(&registry).unwrap();
        let b = ListNavigator::next(&registry, &a).unwrap();
        let c = ListNavigator::next(&registry, &b).unwrap();

        assert_eq!(window(&a), 1);
        assert_eq!(window(&b), 2);
        assert_eq!(window(&c), 3);
        assert_eq!(ListNavigator::next(&registry, &c).unwrap(), a);
        assert_eq!(ListNavigator::prev(&registry, &a).unwrap(), c);
        assert_eq!(ListNavigator::count(&registry), 3);
    }

    #[test]
    fn test_next_is_circular() {
        let registry = abc();
        let n = ListNavigator::count(&registry);

        for start in ListNavigator::all_handles(&registry) {
            let mut current = start;
            for _ in 0..n {
                current = ListNavigator::next(&registry, &current).unwrap();
            }
            assert_eq!(current, start);
        }
    }

    #[test]
    fn test_prev_and_next_are_inverse() {
        let registry = abc();

        for handle in ListNavigator::all_handles(&registry) {
            let next = ListNavigator::next(&registry, &handle).unwrap();
            let prev = ListNavigator::prev(&registry, &handle).unwrap();
            assert_eq!(ListNavigator::prev(&registry, &next).unwrap(), handle);
            assert_eq!(ListNavigator::next(&registry, &prev).unwrap(), handle);
        }
    }

    #[test]
    fn test_count_matches_all_handles() {
        let registry = abc();
        assert_eq!(
            ListNavigator::count(&registry),
            ListNavigator::all_handles(&registry).len()
        );
        assert_eq!(ListNavigator::all_handles(&ClientRegistry::new()).len(), 0);
    }

    #[test]
    fn test_single_client_points_to_itself() {
        let mut registry = ClientRegistry::new();
        registry.manage(9, Geometry::default(), 0);

        let only = ListNavigator::first(&registry).unwrap();
        assert_eq!(ListNavigator::next(&registry, &only).unwrap(), only);
        assert_eq!(ListNavigator::prev(&registry, &only).unwrap(), only);
    }

    #[test]
    fn test_empty_registry_first_fails() {
        let registry = ClientRegistry::new();
        assert!(matches!(
            ListNavigator::first(&registry),
            Err(BridgeError::EmptyRegistry)
        ));
    }

    #[test]
    fn test_stale_handle_not_in_registry() {
        let mut registry = abc();
        let b = ListNavigator::next(&registry, &ListNavigator::first(&registry).unwrap()).unwrap();
        registry.unmanage(b.key());

        assert!(matches!(
            ListNavigator::next(&registry, &b),
            Err(BridgeError::NotInRegistry(2))
        ));
        assert!(matches!(
            ListNavigator::prev(&registry, &b),
            Err(BridgeError::NotInRegistry(2))
        ));
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut registry = abc();
        let snapshot = ListNavigator::all_handles(&registry);
        registry.manage(4, Geometry::default(), 0);

        assert_eq!(snapshot.len(), 3);
        assert_eq!(ListNavigator::count(&registry), 4);
    }
}
