pub mod key_name_to_keysym;
pub mod modifier_mask;

pub use key_name_to_keysym::KeyNameToKeysym;
pub use modifier_mask::ModifierMask;
