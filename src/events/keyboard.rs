use crate::mappings::KeyNameToKeysym;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Биты модификаторов X11 (xcb_mod_mask_t)
pub const MOD_SHIFT: u16 = 1 << 0;
pub const MOD_LOCK: u16 = 1 << 1;
pub const MOD_CONTROL: u16 = 1 << 2;
pub const MOD_1: u16 = 1 << 3;
pub const MOD_2: u16 = 1 << 4;
pub const MOD_3: u16 = 1 << 5;
pub const MOD_4: u16 = 1 << 6;
pub const MOD_5: u16 = 1 << 7;

const MOD_NAMES: [(u16, &str); 8] = [
    (MOD_SHIFT, "shift"),
    (MOD_LOCK, "lock"),
    (MOD_CONTROL, "ctrl"),
    (MOD_1, "alt"),
    (MOD_2, "mod2"),
    (MOD_3, "mod3"),
    (MOD_4, "super"),
    (MOD_5, "mod5"),
];

/// Комбинация клавиш: маска модификаторов + keysym
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub mod_mask: u16,
    pub keysym: u32,
}

impl KeyChord {
    pub fn new(mod_mask: u16, keysym: u32) -> Self {
        Self { mod_mask, keysym }
    }

    pub fn modifier_names(&self) -> Vec<&'static str> {
        MOD_NAMES
            .iter()
            .filter(|(bit, _)| self.mod_mask & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    /// Имя клавиши, если keysym есть в таблице, иначе шестнадцатеричный код
    pub fn key_name(&self) -> String {
        KeyNameToKeysym::reverse_translate(self.keysym)
            .unwrap_or_else(|| format!("{:#x}", self.keysym))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.modifier_names();
        if modifiers.is_empty() {
            write!(f, "{}", self.key_name())
        } else {
            write!(f, "{}+{}", modifiers.join("+"), self.key_name())
        }
    }
}

/// Событие нажатия, которое внешний диспетчер передаёт в таблицу привязок
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub chord: KeyChord,
    pub timestamp: std::time::Instant,
}

impl KeyEvent {
    pub fn new(chord: KeyChord) -> Self {
        Self {
            chord,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn press(mod_mask: u16, keysym: u32) -> Self {
        Self::new(KeyChord::new(mod_mask, keysym))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}ms ago)",
            self.chord,
            self.timestamp.elapsed().as_millis()
        )
    }
}
