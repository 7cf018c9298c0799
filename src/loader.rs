use crate::error::VehicleError;
use crate::model::{Vehicle, VehicleRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Bridge between the on-disk JSON representation and the in-memory model.
///
/// Injectable so the repository can be tested without touching the
/// filesystem.
pub trait VehicleLoader: Send + Sync {
    /// Decode the configured file into a collection keyed by vehicle id.
    fn load(&self) -> Result<HashMap<u32, Vehicle>, VehicleError>;

    /// Encode the full collection back to the configured file, truncating
    /// whatever was there. Array order is unspecified.
    fn save(&self, vehicles: &HashMap<u32, Vehicle>) -> Result<(), VehicleError>;
}

/// Loader backed by a single JSON file holding an array of vehicle objects.
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VehicleLoader for JsonFileLoader {
    fn load(&self) -> Result<HashMap<u32, Vehicle>, VehicleError> {
        let file =
            File::open(&self.path).map_err(|source| VehicleError::io(&self.path, source))?;
        let records: Vec<VehicleRecord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| VehicleError::json(&self.path, source))?;

        let mut vehicles = HashMap::with_capacity(records.len());
        for record in records {
            let vehicle = Vehicle::from(record);
            // Duplicate ids in the file: the later entry wins.
            vehicles.insert(vehicle.id, vehicle);
        }
        Ok(vehicles)
    }

    fn save(&self, vehicles: &HashMap<u32, Vehicle>) -> Result<(), VehicleError> {
        let file =
            File::create(&self.path).map_err(|source| VehicleError::io(&self.path, source))?;
        let records: Vec<VehicleRecord> = vehicles.values().map(VehicleRecord::from).collect();

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &records)
            .map_err(|source| VehicleError::json(&self.path, source))?;
        writer
            .flush()
            .map_err(|source| VehicleError::io(&self.path, source))?;
        Ok(())
    }
}
