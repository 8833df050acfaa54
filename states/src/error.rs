use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("State not found: {name}, context: {context}")]
    StateNotFound {
        name: &'static str,
        context: &'static str,
    },
}

impl Error {
    pub fn state_not_found(name: &'static str, context: &'static str) -> Self {
        Self::StateNotFound { name, context }
    }
}
