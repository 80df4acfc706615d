use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Aggregate of every attribute problem found in one validation pass.
    #[error("Invalid claim attributes:\n{}", .0.join("\n"))]
    InvalidAttributes(Vec<String>),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("failed to create claim")]
    CreationFailed,

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Transport-neutral error class. Numeric values follow gRPC status codes so
/// an RPC front end can forward them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::InvalidArgument => 3,
            Self::NotFound => 5,
            Self::Internal => 13,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
        }
    }
}

impl ClaimsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAttributes(_) | Self::InvalidInput(_) => ErrorCode::InvalidArgument,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::CreationFailed | Self::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self.code() {
            ErrorCode::InvalidArgument => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Internal => 500,
        }
    }

    /// Individual messages for the aggregate validation failure, empty otherwise.
    pub fn details(&self) -> &[String] {
        match self {
            Self::InvalidAttributes(errors) => errors,
            _ => &[],
        }
    }
}
