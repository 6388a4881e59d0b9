use sea_orm::DbErr;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain error taxonomy shared by every ledger operation.
///
/// `NotFound` deliberately covers both "row does not exist" and "row is
/// owned by another tenant"; callers must not be able to tell them apart.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("missing tenant context")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("an employee with this name already exists")]
    DuplicateName,
    #[error("payment of {requested_cents} exceeds outstanding balance of {outstanding_cents}")]
    Overpayment {
        requested_cents: i64,
        outstanding_cents: i64,
    },
    #[error("storage failure")]
    Storage(#[from] DbErr),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
