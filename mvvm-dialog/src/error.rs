use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("view model not registered: {view_model}")]
    NotRegistered { view_model: &'static str },

    #[error("view already registered: view_model={view_model}, view={view}")]
    AlreadyRegistered {
        view_model: &'static str,
        view: &'static str,
    },

    #[error("invalid parameter key: {0:?}")]
    InvalidKey(String),

    #[error("parameter not found: {0}")]
    KeyNotFound(String),

    #[error("type mismatch: key={key}, expected={expected}, found={found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
