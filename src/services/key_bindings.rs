use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::KeyChord;
use dashmap::DashMap;
use mlua::{Function, Lua, RegistryKey};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

/// Что делать с повторной привязкой той же комбинации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingPolicy {
    /// Новая привязка заменяет старую
    Replace,
    /// Хранятся все привязки, вызываются от новой к старой
    Accumulate,
}

/// Таблица привязок клавиш: (маска модификаторов, keysym) -> функции Lua.
/// Функции хранятся в реестре Lua; таблица только растёт, отвязки нет.
pub struct KeyBindingTable {
    policy: BindingPolicy,
    entries: DashMap<KeyChord, SmallVec<[RegistryKey; 1]>>,
}

impl KeyBindingTable {
    pub fn new(policy: BindingPolicy) -> Self {
        info!("Инициализация таблицы привязок (политика: {:?})", policy);
        Self {
            policy,
            entries: DashMap::new(),
        }
    }

    pub fn bind(&self, lua: &Lua, chord: KeyChord, callback: Function) -> Result<()> {
        let key = lua.create_registry_value(callback)?;
        let mut entry = self.entries.entry(chord).or_default();

        match self.policy {
            BindingPolicy::Replace => {
                let replaced = !entry.is_empty();
                entry.clear();
                entry.push(key);
                drop(entry);
                if replaced {
                    debug_if_enabled!("Привязка {} заменена", chord);
                    // Старые RegistryKey уже сброшены, освобождаем их значения
                    lua.expire_registry_values();
                }
            }
            BindingPolicy::Accumulate => {
                entry.push(key);
                debug_if_enabled!("Привязка {} добавлена, всего {}", chord, entry.len());
            }
        }

        info!("Клавиша {} привязана", chord);
        Ok(())
    }

    /// Функции для комбинации, самая свежая первой.
    /// Ссылка на запись отпускается до возврата, так что вызовы могут снова привязывать клавиши.
    pub fn callbacks(&self, lua: &Lua, chord: &KeyChord) -> Result<Vec<Function>> {
        let Some(entry) = self.entries.get(chord) else {
            return Ok(Vec::new());
        };

        let callbacks = entry
            .iter()
            .rev()
            .map(|key| lua.registry_value::<Function>(key))
            .collect::<mlua::Result<Vec<_>>>()?;
        Ok(callbacks)
    }

    pub fn contains(&self, chord: &KeyChord) -> bool {
        self.entries.contains_key(chord)
    }

    /// Количество привязанных комбинаций
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
