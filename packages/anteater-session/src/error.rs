use std::fmt;

/// Which request class produced a [`SessionError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	Search,
	Pagination,
}
impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Search => f.write_str("Search"),
			Self::Pagination => f.write_str("Loading more results"),
		}
	}
}

/// A request failure converted into session state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} failed: {message}")]
pub struct SessionError {
	pub kind: ErrorKind,
	pub message: String,
}
impl SessionError {
	pub(crate) fn search(err: &anteater_client::Error) -> Self {
		Self { kind: ErrorKind::Search, message: err.to_string() }
	}

	pub(crate) fn pagination(err: &anteater_client::Error) -> Self {
		Self { kind: ErrorKind::Pagination, message: err.to_string() }
	}
}
