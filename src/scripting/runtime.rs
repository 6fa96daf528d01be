use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::KeyEvent;
use crate::scripting::host_functions::{register_host_functions, HostServices, HOST_FUNCTIONS};
use crate::services::WmContext;
use mlua::{FromLuaMulti, Lua};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Встроенный Lua вместе с функциями хоста и диспетчеризацией привязок
pub struct ScriptRuntime {
    lua: Lua,
    services: HostServices,
}

impl ScriptRuntime {
    pub fn new(services: HostServices) -> Result<Self> {
        let lua = Lua::new();
        register_host_functions(&lua, &services)?;
        info!(
            "Скриптовый движок готов, зарегистрировано {} функций хоста",
            HOST_FUNCTIONS.len()
        );
        Ok(Self { lua, services })
    }

    pub fn context(&self) -> &Arc<WmContext> {
        &self.services.ctx
    }

    pub fn services(&self) -> &HostServices {
        &self.services
    }

    pub fn exec(&self, chunk: &str) -> Result<()> {
        self.lua.load(chunk).set_name("=eval").exec()?;
        Ok(())
    }

    pub fn eval<R: FromLuaMulti>(&self, chunk: &str) -> Result<R> {
        Ok(self.lua.load(chunk).set_name("=eval").eval()?)
    }

    pub fn exec_file(&self, path: &Path) -> Result<()> {
        info!("Выполнение скрипта {}", path.display());
        let source = std::fs::read_to_string(path)?;
        self.lua
            .load(source.as_str())
            .set_name(format!("@{}", path.display()))
            .exec()?;
        Ok(())
    }

    /// Вызывает обработчики комбинации и возвращает их число.
    /// Ошибка в обработчике логируется и не прерывает остальные.
    pub fn dispatch_key(&self, event: &KeyEvent) -> Result<usize> {
        if self.services.ctx.trace_events() {
            info!("Событие клавиатуры: {}", event);
        }

        let callbacks = self.services.bindings.callbacks(&self.lua, &event.chord)?;
        if callbacks.is_empty() {
            debug_if_enabled!("Для {} нет привязки", event.chord);
            return Ok(0);
        }

        for callback in &callbacks {
            if let Err(e) = callback.call::<()>(()) {
                error!("Ошибка в обработчике клавиши {}: {}", event.chord, e);
            }
        }

        Ok(callbacks.len())
    }
}
