use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("erreur d'écriture : {0}")]
    Io(#[from] std::io::Error),
    #[error("erreur de sérialisation : {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
