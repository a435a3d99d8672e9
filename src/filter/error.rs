use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("sortBy tidak valid: {0}")]
    InvalidSort(String),

    #[error("order harus asc atau desc")]
    InvalidOrder(String),

    #[error("page harus berupa angka")]
    InvalidPage(String),

    #[error("limit harus antara 1 dan {max}")]
    InvalidLimit { value: String, max: i64 },
}
