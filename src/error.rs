use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GCError {
    #[error("Object is already registered: {0}")]
    DuplicateObject(String),

    #[error("Object is not registered: {0}")]
    UnknownObject(String),
}

impl GCError {
    pub(crate) fn duplicate<K: std::fmt::Debug>(key: &K) -> Self {
        GCError::DuplicateObject(format!("{key:?}"))
    }

    pub(crate) fn unknown<K: std::fmt::Debug>(key: &K) -> Self {
        GCError::UnknownObject(format!("{key:?}"))
    }
}
