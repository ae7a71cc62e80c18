pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	/// Structured retrieval failed; the underlying cause is logged, the
	/// caller only sees this generic condition.
	#[error("Search is temporarily unavailable.")]
	RetrievalFailed,
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<lotscout_storage::Error> for Error {
	fn from(err: lotscout_storage::Error) -> Self {
		match err {
			lotscout_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			lotscout_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			lotscout_storage::Error::NotFound(message) => Self::InvalidRequest { message },
		}
	}
}
