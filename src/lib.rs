//! Скриптовый мост оконного менеджера.
//!
//! Lua-скрипты видят список управляемых клиентов через дескрипторы,
//! двигают и фокусируют окна, привязывают клавиши и запускают программы.
//! Всё, что касается дисплея, делает реализация [`services::WindowCore`].

pub mod config;
pub mod error;
pub mod events;
pub mod mappings;
pub mod scripting;
pub mod services;
pub mod utils;
