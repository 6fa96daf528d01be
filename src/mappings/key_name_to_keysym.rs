/// Преобразование имён клавиш в X11 keysym
/// Отвечает за трансляцию строковых имён клавиш из конфигурации в числовые keysym
pub struct KeyNameToKeysym;

const XK_F1: u32 = 0xffbe;

const NAMED_KEYS: [(&str, u32); 17] = [
    ("space", 0x0020),
    ("return", 0xff0d),
    ("enter", 0xff0d),
    ("tab", 0xff09),
    ("escape", 0xff1b),
    ("backspace", 0xff08),
    ("delete", 0xffff),
    ("home", 0xff50),
    ("left", 0xff51),
    ("up", 0xff52),
    ("right", 0xff53),
    ("down", 0xff54),
    ("pageup", 0xff55),
    ("pagedown", 0xff56),
    ("end", 0xff57),
    ("print", 0xff61),
    ("insert", 0xff63),
];

impl KeyNameToKeysym {
    /// Получить keysym клавиши по её имени
    pub fn translate(key_name: &str) -> Result<u32, String> {
        let normalized = key_name.to_lowercase();
        let mut chars = normalized.chars();

        // Буквы и цифры совпадают с Latin-1 кодами
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                return Ok(c as u32);
            }
        }

        // Функциональные клавиши F1..F12
        if let Some(n) = normalized.strip_prefix('f').and_then(|n| n.parse::<u32>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(XK_F1 + n - 1);
            }
        }

        NAMED_KEYS
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, keysym)| *keysym)
            .ok_or_else(|| format!("Неизвестная клавиша: {}", key_name))
    }

    /// Обратное преобразование keysym в имя
    pub fn reverse_translate(keysym: u32) -> Option<String> {
        match keysym {
            0x61..=0x7a | 0x30..=0x39 => char::from_u32(keysym).map(|c| c.to_string()),
            k if (XK_F1..XK_F1 + 12).contains(&k) => Some(format!("f{}", k - XK_F1 + 1)),
            k => NAMED_KEYS
                .iter()
                .find(|(_, keysym)| *keysym == k)
                .map(|(name, _)| name.to_string()),
        }
    }
}
