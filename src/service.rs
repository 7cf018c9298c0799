use crate::model::{Vehicle, VehicleAttributes};
use crate::repository::VehicleRepository;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Pass-through layer between the HTTP handlers and the repository.
///
/// Each operation forwards unchanged and wraps failures with the operation
/// name and parameters. The original [`crate::error::VehicleError`] stays
/// reachable through `Error::downcast_ref`, so callers can still branch on
/// kind.
#[derive(Clone)]
pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    pub fn find_all(&self) -> HashMap<u32, Vehicle> {
        self.repository.find_all()
    }

    pub fn create(&self, attributes: VehicleAttributes) -> Result<Vehicle> {
        self.repository
            .create(attributes)
            .context("creating vehicle")
    }

    pub fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<HashMap<u32, Vehicle>> {
        self.repository
            .get_by_color_and_year(color, year)
            .with_context(|| format!("getting vehicles with color {color} and year {year}"))
    }

    pub fn get_by_dimensions(
        &self,
        min_length: f64,
        max_length: f64,
        min_width: f64,
        max_width: f64,
    ) -> Result<HashMap<u32, Vehicle>> {
        self.repository
            .get_by_dimensions(min_length, max_length, min_width, max_width)
            .with_context(|| {
                format!(
                    "getting vehicles with length {min_length}-{max_length} \
                     and width {min_width}-{max_width}"
                )
            })
    }

    pub fn get_average_speed_by_brand(&self, brand: &str) -> Result<f64> {
        self.repository
            .get_average_speed_by_brand(brand)
            .with_context(|| format!("getting average speed for brand {brand}"))
    }
}
