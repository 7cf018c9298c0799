use serde::{Deserialize, Serialize};

/// Physical size of a vehicle, in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

/// Everything that describes a vehicle except its identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleAttributes {
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub color: String,
    pub fabrication_year: i32,
    pub capacity: i32,
    pub max_speed: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub weight: f64,
    pub dimensions: Dimensions,
}

/// The sole persisted entity. `id` is assigned by the repository on creation
/// and is zero for records that have not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vehicle {
    pub id: u32,
    pub attributes: VehicleAttributes,
}

/// Flat wire shape shared by the seed file and every HTTP response body.
///
/// Dimensions are flattened into the three top-level keys `height`, `length`
/// and `width`. Missing keys decode to their zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleRecord {
    pub id: u32,
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub color: String,
    #[serde(rename = "year")]
    pub fabrication_year: i32,
    #[serde(rename = "passengers")]
    pub capacity: i32,
    pub max_speed: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub weight: f64,
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

/// POST body shape: a `VehicleRecord` without an identity. Any client-supplied
/// `id` key is ignored by serde and a fresh one is assigned on create.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewVehicleRecord {
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub color: String,
    #[serde(rename = "year")]
    pub fabrication_year: i32,
    #[serde(rename = "passengers")]
    pub capacity: i32,
    pub max_speed: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub weight: f64,
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

impl NewVehicleRecord {
    pub fn into_attributes(self) -> VehicleAttributes {
        VehicleAttributes {
            brand: self.brand,
            model: self.model,
            registration: self.registration,
            color: self.color,
            fabrication_year: self.fabrication_year,
            capacity: self.capacity,
            max_speed: self.max_speed,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            weight: self.weight,
            dimensions: Dimensions {
                height: self.height,
                length: self.length,
                width: self.width,
            },
        }
    }
}

impl From<VehicleRecord> for Vehicle {
    fn from(record: VehicleRecord) -> Self {
        Vehicle {
            id: record.id,
            attributes: VehicleAttributes {
                brand: record.brand,
                model: record.model,
                registration: record.registration,
                color: record.color,
                fabrication_year: record.fabrication_year,
                capacity: record.capacity,
                max_speed: record.max_speed,
                fuel_type: record.fuel_type,
                transmission: record.transmission,
                weight: record.weight,
                dimensions: Dimensions {
                    height: record.height,
                    length: record.length,
                    width: record.width,
                },
            },
        }
    }
}

impl From<&Vehicle> for VehicleRecord {
    fn from(vehicle: &Vehicle) -> Self {
        let attributes = &vehicle.attributes;
        VehicleRecord {
            id: vehicle.id,
            brand: attributes.brand.clone(),
            model: attributes.model.clone(),
            registration: attributes.registration.clone(),
            color: attributes.color.clone(),
            fabrication_year: attributes.fabrication_year,
            capacity: attributes.capacity,
            max_speed: attributes.max_speed,
            fuel_type: attributes.fuel_type.clone(),
            transmission: attributes.transmission.clone(),
            weight: attributes.weight,
            height: attributes.dimensions.height,
            length: attributes.dimensions.length,
            width: attributes.dimensions.width,
        }
    }
}
