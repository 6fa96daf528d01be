pub mod client_registry;
pub mod context;
pub mod diagnostics;
pub mod focus;
pub mod handle;
pub mod key_bindings;
pub mod launcher;
pub mod navigator;
pub mod window_core;

pub use client_registry::ClientRegistry;
pub use context::WmContext;
pub use diagnostics::DiagnosticSink;
pub use focus::FocusTracker;
pub use handle::ClientHandle;
pub use key_bindings::{BindingPolicy, KeyBindingTable};
pub use launcher::ProcessLauncher;
pub use navigator::ListNavigator;
pub use window_core::{DryRunCore, WindowCore};
