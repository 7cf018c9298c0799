use crate::error::VehicleError;
use crate::loader::VehicleLoader;
use crate::model::{Vehicle, VehicleAttributes};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Owner of the authoritative in-memory collection: answers queries, assigns
/// ids and triggers persistence on create.
pub trait VehicleRepository: Send + Sync {
    /// Shallow copy of the whole collection. Never fails.
    fn find_all(&self) -> HashMap<u32, Vehicle>;

    /// Assign the next id, persist the grown collection, and return the
    /// stored vehicle. The in-memory state only changes after the save
    /// succeeded.
    fn create(&self, attributes: VehicleAttributes) -> Result<Vehicle, VehicleError>;

    /// Vehicles matching the color and fabrication year exactly.
    fn get_by_color_and_year(
        &self,
        color: &str,
        year: i32,
    ) -> Result<HashMap<u32, Vehicle>, VehicleError>;

    /// Vehicles whose length and width both fall within the given inclusive
    /// bounds. The bounds are not validated against each other.
    fn get_by_dimensions(
        &self,
        min_length: f64,
        max_length: f64,
        min_width: f64,
        max_width: f64,
    ) -> Result<HashMap<u32, Vehicle>, VehicleError>;

    /// Arithmetic mean of `max_speed` across vehicles of the given brand.
    fn get_average_speed_by_brand(&self, brand: &str) -> Result<f64, VehicleError>;
}

struct Inner {
    vehicles: HashMap<u32, Vehicle>,
    // Highest id ever assigned; ids are never reused.
    last_id: u32,
}

/// In-memory map of id to vehicle, guarded by a single lock so reads and the
/// create path serialize. Persistence is delegated to the injected loader.
pub struct VehicleMap {
    loader: Arc<dyn VehicleLoader>,
    inner: RwLock<Inner>,
}

impl VehicleMap {
    pub fn new(loader: Arc<dyn VehicleLoader>, seed: HashMap<u32, Vehicle>) -> Self {
        let last_id = seed.keys().copied().max().unwrap_or(0);
        Self {
            loader,
            inner: RwLock::new(Inner {
                vehicles: seed,
                last_id,
            }),
        }
    }
}

impl VehicleRepository for VehicleMap {
    fn find_all(&self) -> HashMap<u32, Vehicle> {
        self.inner.read().vehicles.clone()
    }

    fn create(&self, attributes: VehicleAttributes) -> Result<Vehicle, VehicleError> {
        let mut inner = self.inner.write();
        let id = inner.last_id + 1;
        let vehicle = Vehicle { id, attributes };

        // Persist the candidate collection first. On failure the in-memory
        // map and the id counter are left untouched.
        let mut candidate = inner.vehicles.clone();
        candidate.insert(id, vehicle.clone());
        self.loader.save(&candidate)?;

        inner.vehicles = candidate;
        inner.last_id = id;
        tracing::info!(id, brand = %vehicle.attributes.brand, "vehicle created");
        Ok(vehicle)
    }

    fn get_by_color_and_year(
        &self,
        color: &str,
        year: i32,
    ) -> Result<HashMap<u32, Vehicle>, VehicleError> {
        let inner = self.inner.read();
        let matches: HashMap<u32, Vehicle> = inner
            .vehicles
            .iter()
            .filter(|(_, v)| v.attributes.color == color && v.attributes.fabrication_year == year)
            .map(|(id, v)| (*id, v.clone()))
            .collect();

        if matches.is_empty() {
            return Err(VehicleError::NotFound(format!(
                "no vehicles found with color {color} and year {year}"
            )));
        }
        Ok(matches)
    }

    fn get_by_dimensions(
        &self,
        min_length: f64,
        max_length: f64,
        min_width: f64,
        max_width: f64,
    ) -> Result<HashMap<u32, Vehicle>, VehicleError> {
        let inner = self.inner.read();
        let matches: HashMap<u32, Vehicle> = inner
            .vehicles
            .iter()
            .filter(|(_, v)| {
                let dimensions = &v.attributes.dimensions;
                dimensions.length >= min_length
                    && dimensions.length <= max_length
                    && dimensions.width >= min_width
                    && dimensions.width <= max_width
            })
            .map(|(id, v)| (*id, v.clone()))
            .collect();

        if matches.is_empty() {
            return Err(VehicleError::NotFound(format!(
                "no vehicles found with length between {min_length} and {max_length} \
                 and width between {min_width} and {max_width}"
            )));
        }
        Ok(matches)
    }

    fn get_average_speed_by_brand(&self, brand: &str) -> Result<f64, VehicleError> {
        let inner = self.inner.read();
        let speeds: Vec<f64> = inner
            .vehicles
            .values()
            .filter(|v| v.attributes.brand == brand)
            .map(|v| v.attributes.max_speed)
            .collect();

        if speeds.is_empty() {
            return Err(VehicleError::NotFound(format!(
                "no vehicles found for brand {brand}"
            )));
        }
        Ok(speeds.iter().sum::<f64>() / speeds.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dimensions;
    use assert_matches::assert_matches;
    use parking_lot::Mutex;

    /// Loader that records what was saved instead of touching disk.
    #[derive(Default)]
    struct RecordingLoader {
        saved: Mutex<Option<HashMap<u32, Vehicle>>>,
    }

    impl VehicleLoader for RecordingLoader {
        fn load(&self) -> Result<HashMap<u32, Vehicle>, VehicleError> {
            Ok(HashMap::new())
        }

        fn save(&self, vehicles: &HashMap<u32, Vehicle>) -> Result<(), VehicleError> {
            *self.saved.lock() = Some(vehicles.clone());
            Ok(())
        }
    }

    /// Loader whose save always fails with an io error.
    struct FailingLoader;

    impl VehicleLoader for FailingLoader {
        fn load(&self) -> Result<HashMap<u32, Vehicle>, VehicleError> {
            Ok(HashMap::new())
        }

        fn save(&self, _vehicles: &HashMap<u32, Vehicle>) -> Result<(), VehicleError> {
            Err(VehicleError::io(
                "vehicles.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    fn vehicle(id: u32, brand: &str, color: &str, year: i32, max_speed: f64) -> Vehicle {
        Vehicle {
            id,
            attributes: VehicleAttributes {
                brand: brand.into(),
                color: color.into(),
                fabrication_year: year,
                max_speed,
                ..Default::default()
            },
        }
    }

    fn sized_vehicle(id: u32, length: f64, width: f64) -> Vehicle {
        Vehicle {
            id,
            attributes: VehicleAttributes {
                dimensions: Dimensions {
                    length,
                    width,
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    fn seeded(vehicles: Vec<Vehicle>) -> VehicleMap {
        let seed = vehicles.into_iter().map(|v| (v.id, v)).collect();
        VehicleMap::new(Arc::new(RecordingLoader::default()), seed)
    }

    #[test]
    fn find_all_returns_a_copy_of_the_seed() {
        let repository = seeded(vec![
            vehicle(1, "Toyota", "red", 2020, 180.0),
            vehicle(2, "Honda", "blue", 2018, 170.0),
        ]);

        let all = repository.find_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&1].attributes.brand, "Toyota");
        assert_eq!(all[&2].attributes.brand, "Honda");
    }

    #[test]
    fn create_assigns_strictly_increasing_ids_from_the_seed_maximum() {
        let repository = seeded(vec![vehicle(5, "Toyota", "red", 2020, 180.0)]);

        let first = repository
            .create(VehicleAttributes::default())
            .expect("create succeeds");
        let second = repository
            .create(VehicleAttributes::default())
            .expect("create succeeds");

        assert_eq!(first.id, 6);
        assert_eq!(second.id, 7);
        assert_eq!(repository.find_all().len(), 3);
    }

    #[test]
    fn create_persists_the_full_collection() {
        let loader = Arc::new(RecordingLoader::default());
        let seed = HashMap::from([(1, vehicle(1, "Toyota", "red", 2020, 180.0))]);
        let repository = VehicleMap::new(loader.clone(), seed);

        repository
            .create(VehicleAttributes {
                brand: "Honda".into(),
                ..Default::default()
            })
            .expect("create succeeds");

        let saved = loader.saved.lock().clone().expect("save was called");
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[&2].attributes.brand, "Honda");
    }

    #[test]
    fn create_leaves_memory_untouched_when_save_fails() {
        let seed = HashMap::from([(1, vehicle(1, "Toyota", "red", 2020, 180.0))]);
        let repository = VehicleMap::new(Arc::new(FailingLoader), seed);

        let result = repository.create(VehicleAttributes::default());
        assert_matches!(result, Err(VehicleError::Io { .. }));

        // Nothing committed, and the failed id is reused by the next attempt.
        assert_eq!(repository.find_all().len(), 1);
    }

    #[test]
    fn color_and_year_require_exact_matches_on_both() {
        let repository = seeded(vec![
            vehicle(1, "Toyota", "red", 2020, 180.0),
            vehicle(2, "Honda", "red", 2018, 170.0),
            vehicle(3, "Fiat", "blue", 2020, 160.0),
        ]);

        let matches = repository
            .get_by_color_and_year("red", 2020)
            .expect("one match");
        assert_eq!(matches.len(), 1);
        assert!(matches.contains_key(&1));

        assert_matches!(
            repository.get_by_color_and_year("red", 2019),
            Err(VehicleError::NotFound(_))
        );
    }

    #[test]
    fn dimension_bounds_are_inclusive_on_both_axes() {
        let repository = seeded(vec![
            sized_vehicle(1, 4.5, 1.8),
            sized_vehicle(2, 5.0, 2.0),
            sized_vehicle(3, 5.1, 1.9),
        ]);

        // Vehicle 2 sits exactly on both upper bounds and is included.
        let matches = repository
            .get_by_dimensions(4.0, 5.0, 1.0, 2.0)
            .expect("two matches");
        assert_eq!(matches.len(), 2);
        assert!(matches.contains_key(&1));
        assert!(matches.contains_key(&2));
    }

    #[test]
    fn inverted_dimension_bounds_yield_not_found() {
        let repository = seeded(vec![sized_vehicle(1, 4.5, 1.8)]);
        assert_matches!(
            repository.get_by_dimensions(5.0, 4.0, 1.0, 2.0),
            Err(VehicleError::NotFound(_))
        );
    }

    #[test]
    fn average_speed_is_the_arithmetic_mean_over_the_brand() {
        let repository = seeded(vec![
            vehicle(1, "Toyota", "red", 2020, 180.0),
            vehicle(2, "Toyota", "blue", 2018, 200.0),
            vehicle(3, "Honda", "red", 2020, 150.0),
        ]);

        let average = repository
            .get_average_speed_by_brand("Toyota")
            .expect("brand exists");
        assert_eq!(average, 190.0);
    }

    #[test]
    fn average_speed_for_unknown_brand_is_not_found() {
        let repository = seeded(vec![vehicle(1, "Toyota", "red", 2020, 180.0)]);
        assert_matches!(
            repository.get_average_speed_by_brand("Lada"),
            Err(VehicleError::NotFound(_))
        );
    }

    #[test]
    fn empty_seed_starts_ids_at_one() {
        let repository = seeded(vec![]);
        let created = repository
            .create(VehicleAttributes::default())
            .expect("create succeeds");
        assert_eq!(created.id, 1);
    }
}
