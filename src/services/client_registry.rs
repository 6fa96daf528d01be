//! ClientRegistry: authoritative list of managed clients.
//!
//! Clients live in a generational arena and are chained through `Client::next`
//! starting from `head`, the same singly linked shape the window manager core
//! walks. Only the core manages/unmanages clients; the scripting bridge reads
//! the chain and mutates geometry of clients it can still resolve.

use crate::events::{Client, ClientKey, Geometry, WindowId};
use slotmap::SlotMap;

#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: SlotMap<ClientKey, Client>,
    head: Option<ClientKey>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Новый клиент всегда встаёт в голову списка
    pub fn manage(&mut self, window: WindowId, geometry: Geometry, border_width: u16) -> ClientKey {
        let mut client = Client::new(window, geometry, border_width);
        client.next = self.head;
        let key = self.clients.insert(client);
        self.head = Some(key);
        key
    }

    /// Отвязывает клиента от цепочки и освобождает слот.
    /// Все ключи, выданные ранее для этого клиента, становятся устаревшими.
    pub fn unmanage(&mut self, key: ClientKey) -> Option<Client> {
        let next = self.clients.get(key)?.next;

        if self.head == Some(key) {
            self.head = next;
        } else if let Some(prev) = self.predecessor(key) {
            if let Some(prev_client) = self.clients.get_mut(prev) {
                prev_client.next = next;
            }
        }

        let mut client = self.clients.remove(key)?;
        client.next = None;
        Some(client)
    }

    pub fn head(&self) -> Option<ClientKey> {
        self.head
    }

    pub fn get(&self, key: ClientKey) -> Option<&Client> {
        self.clients.get(key)
    }

    pub fn get_mut(&mut self, key: ClientKey) -> Option<&mut Client> {
        self.clients.get_mut(key)
    }

    pub fn contains(&self, key: ClientKey) -> bool {
        self.clients.contains_key(key)
    }

    pub fn next_of(&self, key: ClientKey) -> Option<ClientKey> {
        self.clients.get(key).and_then(|client| client.next)
    }

    /// Узел, чей `next` указывает на `key` (None для головы)
    pub fn predecessor(&self, key: ClientKey) -> Option<ClientKey> {
        self.keys().find(|&candidate| self.next_of(candidate) == Some(key))
    }

    pub fn find_window(&self, window: WindowId) -> Option<ClientKey> {
        self.iter()
            .find(|(_, client)| client.window == window)
            .map(|(key, _)| key)
    }

    /// Длина цепочки от головы
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys {
            registry: self,
            cursor: self.head,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClientKey, &Client)> + '_ {
        self.keys()
            .filter_map(move |key| self.clients.get(key).map(|client| (key, client)))
    }
}

/// Обход цепочки клиентов от головы
pub struct Keys<'a> {
    registry: &'a ClientRegistry,
    cursor: Option<ClientKey>,
}

impl Iterator for Keys<'_> {
    type Item = ClientKey;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        self.cursor = self.registry.next_of(key);
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(windows: &[WindowId]) -> (ClientRegistry, Vec<ClientKey>) {
        let mut registry = ClientRegistry::new();
        // Вставка идёт в голову, поэтому добавляем в обратном порядке
        let mut keys: Vec<ClientKey> = windows
            .iter()
            .rev()
            .map(|&window| registry.manage(window, Geometry::default(), 1))
            .collect();
        keys.reverse();
        (registry, keys)
    }

    fn windows(registry: &ClientRegistry) -> Vec<WindowId> {
        registry.iter().map(|(_, client)| client.window).collect()
    }

    #[test]
    fn test_manage_prepends() {
        let mut registry = ClientRegistry::new();
        registry.manage(1, Geometry::default(), 0);
        registry.manage(2, Geometry::default(), 0);

        assert_eq!(windows(&registry), vec![2, 1]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unmanage_head_middle_and_tail() {
        let (mut registry, keys) = registry_with(&[1, 2, 3, 4]);

        assert_eq!(registry.unmanage(keys[1]).map(|c| c.window), Some(2));
        assert_eq!(windows(&registry), vec![1, 3, 4]);

        assert_eq!(registry.unmanage(keys[0]).map(|c| c.window), Some(1));
        assert_eq!(windows(&registry), vec![3, 4]);

        assert_eq!(registry.unmanage(keys[3]).map(|c| c.window), Some(4));
        assert_eq!(windows(&registry), vec![3]);
        assert_eq!(registry.next_of(keys[2]), None);
    }

    #[test]
    fn test_stale_key_after_unmanage() {
        let (mut registry, keys) = registry_with(&[1, 2]);
        registry.unmanage(keys[0]);

        // Слот переиспользуется, но старый ключ остаётся недействительным
        let reused = registry.manage(9, Geometry::default(), 0);
        assert_ne!(reused, keys[0]);
        assert!(!registry.contains(keys[0]));
        assert!(registry.get(keys[0]).is_none());
        assert!(registry.unmanage(keys[0]).is_none());
        assert_eq!(windows(&registry), vec![9, 2]);
    }

    #[test]
    fn test_predecessor_and_find_window() {
        let (registry, keys) = registry_with(&[1, 2, 3]);

        assert_eq!(registry.predecessor(keys[0]), None);
        assert_eq!(registry.predecessor(keys[2]), Some(keys[1]));
        assert_eq!(registry.find_window(3), Some(keys[2]));
        assert_eq!(registry.find_window(42), None);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ClientRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.head(), None);
    }
}
