//! Host functions: the names scripts can call.
//!
//! Every entry point unwraps its handle arguments, delegates to the context or
//! one of the services and converts `BridgeError` into a Lua error, so scripts
//! can `pcall` any of them. Argument count and primitive types are checked by
//! mlua's conversions before the closure body runs.

use crate::config::Config;
use crate::error::Result;
use crate::events::KeyChord;
use crate::services::{
    ClientHandle, DiagnosticSink, KeyBindingTable, ListNavigator, ProcessLauncher, WindowCore,
    WmContext,
};
use crate::trace_if_enabled;
use mlua::{Function, IntoLuaMulti, Lua, MultiValue, Value};
use std::sync::Arc;

/// Имена, которые регистрируются в глобальной таблице Lua
pub const HOST_FUNCTIONS: [&str; 24] = [
    "stop",
    "count_clients",
    "all_clients",
    "first_client",
    "next_client",
    "prev_client",
    "move_client",
    "resize_client",
    "map_client",
    "dump_client",
    "client_x",
    "client_y",
    "client_width",
    "client_height",
    "screen_width",
    "screen_height",
    "bind_key",
    "get_focus_client",
    "focus_client",
    "launch_program",
    "log",
    "trace_x_events",
    "client_window",
    "client_border_width",
];

/// Всё состояние, к которому обращаются функции хоста
#[derive(Clone)]
pub struct HostServices {
    pub ctx: Arc<WmContext>,
    pub bindings: Arc<KeyBindingTable>,
    pub launcher: Arc<ProcessLauncher>,
    pub sink: Arc<DiagnosticSink>,
}

impl HostServices {
    pub fn new(
        ctx: Arc<WmContext>,
        bindings: Arc<KeyBindingTable>,
        launcher: Arc<ProcessLauncher>,
        sink: Arc<DiagnosticSink>,
    ) -> Self {
        Self {
            ctx,
            bindings,
            launcher,
            sink,
        }
    }

    pub fn from_config(config: &Config, core: Arc<dyn WindowCore>, sink: Arc<DiagnosticSink>) -> Self {
        let ctx = Arc::new(WmContext::new(config.display_geometry(), core));
        ctx.set_trace_events(config.events.trace);

        Self::new(
            ctx,
            Arc::new(KeyBindingTable::new(config.script.binding_policy)),
            Arc::new(ProcessLauncher::new(sink.clone(), config.launcher.reap_children)),
            sink,
        )
    }
}

/// Функция от одного дескриптора клиента
fn handle_fn<R, F>(lua: &Lua, ctx: &Arc<WmContext>, name: &'static str, f: F) -> Result<Function>
where
    R: IntoLuaMulti,
    F: Fn(&WmContext, ClientHandle) -> Result<R> + 'static,
{
    let ctx = Arc::clone(ctx);
    let function = lua.create_function(move |_, value: Value| {
        let handle = ClientHandle::from_value(&value)?;
        trace_if_enabled!("{}({})", name, handle);
        Ok(f(&ctx, handle)?)
    })?;
    Ok(function)
}

pub fn register_host_functions(lua: &Lua, services: &HostServices) -> Result<()> {
    let globals = lua.globals();
    let ctx = &services.ctx;

    // --- Управление ---

    let c = Arc::clone(ctx);
    globals.set(
        "stop",
        lua.create_function(move |_, ()| {
            c.request_stop();
            Ok(true)
        })?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "trace_x_events",
        lua.create_function(move |_, status: Value| {
            // Небулевы значения флаг не трогают
            if let Value::Boolean(enabled) = status {
                c.set_trace_events(enabled);
            }
            Ok(c.trace_events())
        })?,
    )?;

    // --- Обход списка ---

    let c = Arc::clone(ctx);
    globals.set(
        "count_clients",
        lua.create_function(move |_, ()| Ok(ListNavigator::count(&c.registry())))?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "all_clients",
        lua.create_function(move |_, ()| Ok(ListNavigator::all_handles(&c.registry())))?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "first_client",
        lua.create_function(move |_, ()| Ok(ListNavigator::first(&c.registry())?))?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "next_client",
        lua.create_function(move |_, value: Value| {
            match ClientHandle::from_optional_value(&value)? {
                Some(handle) => Ok(Some(ListNavigator::next(&c.registry(), &handle)?)),
                None => Ok(None),
            }
        })?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "prev_client",
        lua.create_function(move |_, value: Value| {
            match ClientHandle::from_optional_value(&value)? {
                Some(handle) => Ok(Some(ListNavigator::prev(&c.registry(), &handle)?)),
                None => Ok(None),
            }
        })?,
    )?;

    // --- Геометрия ---

    let c = Arc::clone(ctx);
    globals.set(
        "move_client",
        lua.create_function(move |_, (value, x, y): (Value, i64, i64)| {
            let handle = ClientHandle::from_value(&value)?;
            trace_if_enabled!("move_client({}, {}, {})", handle, x, y);
            Ok(c.move_client(&handle, x, y)?)
        })?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "resize_client",
        lua.create_function(move |_, (value, width, height): (Value, i64, i64)| {
            let handle = ClientHandle::from_value(&value)?;
            trace_if_enabled!("resize_client({}, {}, {})", handle, width, height);
            Ok(c.resize_client(&handle, width, height)?)
        })?,
    )?;

    globals.set("map_client", handle_fn(lua, ctx, "map_client", |c, h| c.map_client(&h))?)?;
    globals.set(
        "client_x",
        handle_fn(lua, ctx, "client_x", |c, h| Ok(c.client(&h)?.geometry.x))?,
    )?;
    globals.set(
        "client_y",
        handle_fn(lua, ctx, "client_y", |c, h| Ok(c.client(&h)?.geometry.y))?,
    )?;
    globals.set(
        "client_width",
        handle_fn(lua, ctx, "client_width", |c, h| Ok(c.client(&h)?.geometry.width))?,
    )?;
    globals.set(
        "client_height",
        handle_fn(lua, ctx, "client_height", |c, h| Ok(c.client(&h)?.geometry.height))?,
    )?;
    globals.set(
        "client_window",
        handle_fn(lua, ctx, "client_window", |c, h| Ok(c.client(&h)?.window))?,
    )?;
    globals.set(
        "client_border_width",
        handle_fn(lua, ctx, "client_border_width", |c, h| Ok(c.client(&h)?.border_width))?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "screen_width",
        lua.create_function(move |_, ()| Ok(c.display().width))?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "screen_height",
        lua.create_function(move |_, ()| Ok(c.display().height))?,
    )?;

    // --- Фокус ---

    let c = Arc::clone(ctx);
    globals.set(
        "get_focus_client",
        lua.create_function(move |_, ()| Ok(c.focused_client()))?,
    )?;

    let c = Arc::clone(ctx);
    globals.set(
        "focus_client",
        lua.create_function(move |_, args: MultiValue| {
            // Без аргументов - фокус "по умолчанию" на голову списка.
            // Явный nil фокус не меняет.
            let Some(value) = args.front() else {
                return Ok(c.focus_default()?);
            };
            match ClientHandle::from_optional_value(value)? {
                Some(handle) => {
                    c.focus_client(&handle)?;
                    Ok(Some(handle))
                }
                None => {
                    trace_if_enabled!("focus_client(nil) - фокус не изменён");
                    Ok(None)
                }
            }
        })?,
    )?;

    // --- Привязки клавиш ---

    let bindings = Arc::clone(&services.bindings);
    globals.set(
        "bind_key",
        lua.create_function(move |lua, (mod_mask, keysym, callback): (u16, u32, Function)| {
            Ok(bindings.bind(lua, KeyChord::new(mod_mask, keysym), callback)?)
        })?,
    )?;

    // --- Процессы и диагностика ---

    let launcher = Arc::clone(&services.launcher);
    globals.set(
        "launch_program",
        lua.create_function(move |_, path: String| Ok(launcher.launch(&path)))?,
    )?;

    let sink = Arc::clone(&services.sink);
    globals.set(
        "log",
        lua.create_function(move |_, message: String| {
            sink.log(&message);
            Ok(())
        })?,
    )?;

    let c = Arc::clone(ctx);
    let sink = Arc::clone(&services.sink);
    globals.set(
        "dump_client",
        lua.create_function(move |_, value: Value| {
            let handle = ClientHandle::from_value(&value)?;
            let client = c.client(&handle)?;
            sink.dump(&client, c.core());
            Ok(())
        })?,
    )?;

    Ok(())
}
