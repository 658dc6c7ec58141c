/// Broad failure categories.
///
/// Each kind maps to a process exit code so scripts can tell a bad
/// configuration apart from an unreachable object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Config,
    Io,
    Schema,
    MissingColumn,
    Storage,
    Tracking,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage | ErrorKind::Config | ErrorKind::Io => 2,
            ErrorKind::Schema | ErrorKind::MissingColumn => 3,
            ErrorKind::Storage | ErrorKind::Tracking => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_column(name: &str) -> Self {
        Self::new(ErrorKind::MissingColumn, format!("Column `{name}` not found in dataset."))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_distinguishable_from_io() {
        let io = AppError::new(ErrorKind::Io, "disk");
        let remote = AppError::new(ErrorKind::Storage, "remote storage unavailable");
        assert_ne!(io.kind(), remote.kind());
        assert_eq!(remote.exit_code(), 4);
        assert_eq!(io.exit_code(), 2);
    }

    #[test]
    fn missing_column_names_the_column() {
        let err = AppError::missing_column("id");
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
        assert!(err.to_string().contains("`id`"));
    }
}
