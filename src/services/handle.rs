//! ClientHandle: непрозрачное значение, через которое скрипт ссылается на клиента.
//!
//! Дескриптор не владеет клиентом: он хранит только ключ арены (индекс +
//! поколение) и идентификатор окна для печати. Сборка дескриптора сборщиком
//! мусора Lua ничего не делает с клиентом, а разыменование устаревшего
//! дескриптора заканчивается ошибкой вместо обращения к освобождённому клиенту.

use crate::error::{BridgeError, Result};
use crate::events::{Client, ClientKey, WindowId};
use crate::services::client_registry::ClientRegistry;
use mlua::{AnyUserData, MetaMethod, UserData, UserDataMethods, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientHandle {
    key: ClientKey,
    window: WindowId,
}

impl ClientHandle {
    pub fn wrap(key: ClientKey, client: &Client) -> Self {
        Self {
            key,
            window: client.window,
        }
    }

    pub fn key(&self) -> ClientKey {
        self.key
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Извлекает дескриптор из значения Lua; любое другое значение - ошибка скрипта
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::UserData(ud) => ud
                .borrow::<ClientHandle>()
                .map(|handle| *handle)
                .map_err(|_| BridgeError::InvalidHandle("userdata".to_string())),
            other => BridgeError::invalid_handle(other.type_name()),
        }
    }

    /// То же, но nil трактуется как отсутствие дескриптора
    pub fn from_optional_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Nil => Ok(None),
            other => Self::from_value(other).map(Some),
        }
    }

    /// Проверка поколения: клиент должен всё ещё быть в реестре
    pub fn resolve<'r>(&self, registry: &'r ClientRegistry) -> Result<&'r Client> {
        registry
            .get(self.key)
            .ok_or(BridgeError::NotInRegistry(self.window))
    }

    pub fn resolve_mut<'r>(&self, registry: &'r mut ClientRegistry) -> Result<&'r mut Client> {
        registry
            .get_mut(self.key)
            .ok_or(BridgeError::NotInRegistry(self.window))
    }
}

impl fmt::Display for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<client {}>", self.window)
    }
}

impl UserData for ClientHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| Ok(this.to_string()));
        methods.add_meta_method(MetaMethod::Eq, |_, this, other: AnyUserData| {
            Ok(other
                .borrow::<ClientHandle>()
                .map(|other| other.key == this.key)
                .unwrap_or(false))
        });
        methods.add_method("window", |_, this, ()| Ok(this.window));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Geometry;
    use mlua::Lua;

    fn registry_with_client(window: WindowId) -> (ClientRegistry, ClientHandle) {
        let mut registry = ClientRegistry::new();
        let key = registry.manage(window, Geometry::default(), 1);
        let handle = ClientHandle::wrap(key, registry.get(key).unwrap());
        (registry, handle)
    }

    #[test]
    fn test_print_format() {
        let (_, handle) = registry_with_client(42);
        assert_eq!(handle.to_string(), "<client 42>");
    }

    #[test]
    fn test_resolve_detects_stale_handle() {
        let (mut registry, handle) = registry_with_client(7);
        assert_eq!(handle.resolve(&registry).unwrap().window, 7);

        registry.unmanage(handle.key());
        registry.manage(8, Geometry::default(), 1);

        assert!(matches!(
            handle.resolve(&registry),
            Err(BridgeError::NotInRegistry(7))
        ));
    }

    #[test]
    fn test_from_value_rejects_other_values() {
        let lua = Lua::new();
        let table = Value::Table(lua.create_table().unwrap());

        assert!(matches!(
            ClientHandle::from_value(&Value::Integer(3)),
            Err(BridgeError::InvalidHandle(ref t)) if t == "integer"
        ));
        assert!(matches!(
            ClientHandle::from_value(&table),
            Err(BridgeError::InvalidHandle(_))
        ));
        assert!(matches!(ClientHandle::from_optional_value(&Value::Nil), Ok(None)));
    }

    #[test]
    fn test_lua_roundtrip_tostring_and_eq() {
        let lua = Lua::new();
        let (_, handle) = registry_with_client(5);

        lua.globals().set("a", handle).unwrap();
        lua.globals().set("b", handle).unwrap();

        let printed: String = lua.load("return tostring(a)").eval().unwrap();
        assert_eq!(printed, "<client 5>");
        assert!(lua.load("return a == b").eval::<bool>().unwrap());
        assert_eq!(lua.load("return a:window()").eval::<u32>().unwrap(), 5);

        let back: Value = lua.globals().get("a").unwrap();
        assert_eq!(ClientHandle::from_value(&back).unwrap(), handle);
    }

    #[test]
    fn test_collecting_handle_does_not_touch_client() {
        let lua = Lua::new();
        let (registry, handle) = registry_with_client(11);

        lua.globals().set("h", handle).unwrap();
        lua.load("h = nil").exec().unwrap();
        lua.gc_collect().unwrap();

        assert_eq!(handle.resolve(&registry).unwrap().window, 11);
    }
}
