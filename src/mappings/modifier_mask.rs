use crate::events::keyboard::{MOD_1, MOD_2, MOD_3, MOD_4, MOD_5, MOD_CONTROL, MOD_LOCK, MOD_SHIFT};

/// Преобразование имён модификаторов в маску X11
pub struct ModifierMask;

impl ModifierMask {
    pub fn translate(name: &str) -> Result<u16, String> {
        let bit = match name.to_lowercase().as_str() {
            "shift" => MOD_SHIFT,
            "lock" | "capslock" => MOD_LOCK,
            "ctrl" | "control" => MOD_CONTROL,
            "alt" | "mod1" => MOD_1,
            "mod2" | "numlock" => MOD_2,
            "mod3" => MOD_3,
            "super" | "mod4" => MOD_4,
            "mod5" => MOD_5,
            _ => return Err(format!("Неверный модификатор: {}", name)),
        };
        Ok(bit)
    }

    pub fn from_names(names: &[String]) -> Result<u16, String> {
        names
            .iter()
            .try_fold(0u16, |mask, name| -> Result<u16, String> {
                Ok(mask | Self::translate(name)?)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_modifiers() {
        assert_eq!(ModifierMask::translate("shift").unwrap(), 1);
        assert_eq!(ModifierMask::translate("Ctrl").unwrap(), 4);
        assert_eq!(ModifierMask::translate("super").unwrap(), 64);
    }

    #[test]
    fn test_combined_mask() {
        let names = vec!["super".to_string(), "shift".to_string()];
        assert_eq!(ModifierMask::from_names(&names).unwrap(), 65);
        assert_eq!(ModifierMask::from_names(&[]).unwrap(), 0);
    }

    #[test]
    fn test_invalid_modifier() {
        let names = vec!["super".to_string(), "hyper".to_string()];
        assert!(ModifierMask::from_names(&names).is_err());
    }
}
