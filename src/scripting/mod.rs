//! Embedded Lua: host functions and the runtime that owns the interpreter.

pub mod host_functions;
pub mod runtime;

pub use host_functions::{register_host_functions, HostServices, HOST_FUNCTIONS};
pub use runtime::ScriptRuntime;
