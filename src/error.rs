use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Ожидался дескриптор клиента, получено: {0}")]
    InvalidHandle(String),

    #[error("Список клиентов пуст")]
    EmptyRegistry,

    #[error("Клиент {0} больше не управляется оконным менеджером")]
    NotInRegistry(u32),

    #[error("Не удалось сформировать диагностический вывод: {0}")]
    Format(String),

    #[error("Ошибка ядра оконного менеджера: {0}")]
    Collaborator(String),

    #[error("Ошибка Lua: {0}")]
    Lua(#[from] mlua::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub fn invalid_handle<T>(type_name: impl Into<String>) -> Result<T> {
        Err(BridgeError::InvalidHandle(type_name.into()))
    }

    /// Ищет исходную ошибку моста внутри цепочки ошибок Lua (CallbackError -> ExternalError)
    pub fn script_cause(err: &mlua::Error) -> Option<&BridgeError> {
        match err {
            mlua::Error::CallbackError { cause, .. } => Self::script_cause(cause),
            mlua::Error::ExternalError(inner) => inner.downcast_ref::<BridgeError>(),
            _ => None,
        }
    }

    /// То же самое, но для ошибки, уже обёрнутой в BridgeError::Lua
    pub fn root_cause(&self) -> &BridgeError {
        match self {
            BridgeError::Lua(err) => Self::script_cause(err).unwrap_or(self),
            other => other,
        }
    }
}

impl From<BridgeError> for mlua::Error {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Lua(inner) => inner,
            other => mlua::Error::external(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! bridge_error {
    (format, $($arg:tt)*) => {
        $crate::error::BridgeError::Format(format!($($arg)*))
    };
    (collaborator, $($arg:tt)*) => {
        $crate::error::BridgeError::Collaborator(format!($($arg)*))
    };
    (invalid_handle, $($arg:tt)*) => {
        $crate::error::BridgeError::InvalidHandle(format!($($arg)*))
    };
}
