use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// 调用方可见的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    Unavailable,
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Unavailable(_) => ErrorKind::Unavailable,
            AppError::DatabaseError(_) | AppError::ConfigError(_) => ErrorKind::Internal,
        }
    }

    /// 仅存储层暂时性故障可整体重试事务
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Unavailable(_))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        // 唯一索引是并发写入的最终裁决者
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                log::warn!("Unique constraint violated: {msg}");
                return AppError::Conflict(format!("Unique constraint violated: {msg}"));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                log::warn!("Foreign key constraint violated: {msg}");
                return AppError::Conflict(format!("Foreign key constraint violated: {msg}"));
            }
            _ => {}
        }

        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
                log::error!("Database unavailable: {err}");
                AppError::Unavailable(err.to_string())
            }
            DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
            DbErr::RecordNotUpdated => AppError::NotFound("Record not updated".into()),
            other => {
                log::error!("Database error: {other}");
                AppError::DatabaseError(other)
            }
        }
    }
}
