use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, ErrorKind};

const BLOB_SCHEME: &str = "blob://";

/// Where a dataset lives.
///
/// `blob://<container>/<key>` addresses the remote object store; anything else
/// is a local filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Remote { container: String, key: String },
}

impl Location {
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Remote { .. })
    }
}

impl FromStr for Location {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::new(ErrorKind::Usage, "Empty dataset location."));
        }
        let Some(rest) = s.strip_prefix(BLOB_SCHEME) else {
            return Ok(Location::Local(PathBuf::from(s)));
        };
        match rest.split_once('/') {
            Some((container, key)) if !container.is_empty() && !key.is_empty() => Ok(Location::Remote {
                container: container.to_string(),
                key: key.to_string(),
            }),
            _ => Err(AppError::new(
                ErrorKind::Usage,
                format!("Invalid blob location '{s}'. Expected blob://<container>/<key>."),
            )),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Local(p) => write!(f, "{}", p.display()),
            Location::Remote { container, key } => write!(f, "{BLOB_SCHEME}{container}/{key}"),
        }
    }
}
