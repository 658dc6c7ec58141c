use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::info;

use crate::domain::Dataset;
use crate::error::{AppError, ErrorKind};
use crate::io::{read_dataset_csv, write_dataset_csv};
use crate::storage::{DatasetStore, Location};

/// CSV files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn load_path(&self, path: &Path) -> Result<Dataset, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(ErrorKind::Io, format!("Failed to open CSV '{}': {e}", path.display()))
        })?;
        let dataset = read_dataset_csv(file, &path.display().to_string())?;
        info!(path = %path.display(), rows = dataset.n_rows(), "loaded dataset");
        Ok(dataset)
    }

    pub fn store_path(&self, dataset: &Dataset, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::new(
                    ErrorKind::Io,
                    format!("Failed to create directory '{}': {e}", parent.display()),
                )
            })?;
        }
        let file = File::create(path).map_err(|e| {
            AppError::new(ErrorKind::Io, format!("Failed to create CSV '{}': {e}", path.display()))
        })?;
        write_dataset_csv(BufWriter::new(file), dataset)?;
        info!(path = %path.display(), rows = dataset.n_rows(), "stored dataset");
        Ok(())
    }
}

impl DatasetStore for LocalStore {
    fn load(&self, location: &Location) -> Result<Dataset, AppError> {
        match location {
            Location::Local(path) => self.load_path(path),
            Location::Remote { .. } => Err(remote_not_supported(location)),
        }
    }

    fn store(&self, dataset: &Dataset, location: &Location) -> Result<(), AppError> {
        match location {
            Location::Local(path) => self.store_path(dataset, path),
            Location::Remote { .. } => Err(remote_not_supported(location)),
        }
    }
}

fn remote_not_supported(location: &Location) -> AppError {
    AppError::new(
        ErrorKind::Config,
        format!("Local store cannot handle remote location '{location}'."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, ColumnData, Scalar, parse_datetime};
    use crate::validation::time_split;

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ds.csv");
        let ds = Dataset::new(vec![
            Column::new("a", ColumnData::Int(vec![1, 2])),
            Column::new("b", ColumnData::Float(vec![0.5, 1.0])),
        ])
        .unwrap();

        let location = Location::Local(path.clone());
        LocalStore.store(&ds, &location).unwrap();
        assert!(path.exists());
        assert_eq!(LocalStore.load(&location).unwrap(), ds);
    }

    #[test]
    fn stored_partition_reloads_with_source_types() {
        let t0 = parse_datetime("2022-01-01T00:00:00.500").unwrap();
        let ds = Dataset::new(vec![
            Column::new("k", ColumnData::Int(vec![1, 2, 3])),
            Column::new("id", ColumnData::Text(vec!["1".into(), "2".into(), "A-3".into()])),
            Column::new("x", ColumnData::Float(vec![f64::NAN, f64::NAN, 1.5])),
            Column::new("at", ColumnData::Datetime(vec![t0, t0, t0])),
        ])
        .unwrap();
        let (train, _) = time_split(&ds, "k", &Scalar::Int(2)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let location = Location::Local(dir.path().join("train.csv"));
        LocalStore.store(&train, &location).unwrap();
        let back = LocalStore.load(&location).unwrap();

        let types = |d: &Dataset| d.columns().iter().map(|c| c.column_type()).collect::<Vec<_>>();
        assert_eq!(types(&back), types(&ds));
        assert_eq!(back.column("id").unwrap().data, train.column("id").unwrap().data);
        assert_eq!(back.column("at").unwrap().data, ColumnData::Datetime(vec![t0, t0]));
        assert_eq!(back.feature_values("x"), Some(vec![]));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = LocalStore
            .load(&Location::Local("/definitely/not/here.csv".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn remote_locations_are_rejected() {
        let loc = Location::Remote {
            container: "c".into(),
            key: "k.csv".into(),
        };
        assert_eq!(LocalStore.load(&loc).unwrap_err().kind(), ErrorKind::Config);
    }
}
