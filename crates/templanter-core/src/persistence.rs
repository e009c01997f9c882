//! Save/Load functionality for persisting greenhouse state
//!
//! The save document is a versioned [`SaveData`] holding flat plant and
//! worker records. It can be written as JSON (human-readable save slots) or
//! bincode (compact binary). Transient state is not saved: task queues, the
//! backlog, growth strategies and notice flags all start fresh after a load,
//! and plants re-raise their notices on the next tick.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use templanter_logic::catalog::Catalog;
use templanter_logic::lifecycle::GrowthStage;
use templanter_logic::skills::{Progression, SkillSet};
use templanter_logic::work::Role;

use crate::components::{Plant, Worker};
use crate::engine::Statistics;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Role name stored for a worker without roles.
const NO_ROLE: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: u32,
    /// Catalog display name, e.g. `"Rare Cactus"`.
    #[serde(rename = "type")]
    pub plant_type: String,
    pub x: u32,
    pub y: u32,
    /// Stage name, e.g. `"Growing"`.
    pub state: String,
    pub growth: f32,
    pub water: f32,
    pub last_watered: u64,
    /// Minutes spent decaying. Older JSON saves omit it and load as zero.
    #[serde(default)]
    pub decay_timer: f32,
}

impl PlantRecord {
    pub fn from_plant(plant: &Plant, catalog: &Catalog) -> Self {
        Self {
            id: plant.id,
            plant_type: catalog.info(plant.kind).name.clone(),
            x: plant.x,
            y: plant.y,
            state: plant.stage.name().to_string(),
            growth: plant.growth,
            water: plant.water,
            last_watered: plant.last_watered,
            decay_timer: plant.decay_timer,
        }
    }

    pub fn to_plant(&self, catalog: &Catalog) -> Result<Plant, SaveError> {
        let kind = catalog
            .kind_by_name(&self.plant_type)
            .ok_or_else(|| SaveError::UnknownPlantType(self.plant_type.clone()))?;
        let stage = GrowthStage::from_name(&self.state)
            .ok_or_else(|| SaveError::UnknownState(self.state.clone()))?;
        if !self.growth.is_finite() || !self.water.is_finite() || !self.decay_timer.is_finite() {
            return Err(SaveError::InvalidRecord(format!(
                "plant {} has non-finite growth, water or decay timer",
                self.id
            )));
        }
        let mut plant = Plant::restore(
            self.id,
            kind,
            self.x,
            self.y,
            stage,
            self.growth,
            self.water,
            self.last_watered,
        );
        plant.decay_timer = self.decay_timer.max(0.0);
        Ok(plant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: u32,
    pub name: String,
    pub watering: u8,
    pub harvesting: u8,
    pub cashiering: u8,
    pub security: u8,
    pub level: u32,
    pub experience: u32,
    pub salary: i64,
    /// Primary role name, or `"None"`.
    pub role: String,
    pub zone: Option<u32>,
}

impl WorkerRecord {
    pub fn from_worker(worker: &Worker) -> Self {
        Self {
            id: worker.id,
            name: worker.name.clone(),
            watering: worker.skills.watering,
            harvesting: worker.skills.harvesting,
            cashiering: worker.skills.cashiering,
            security: worker.skills.security,
            level: worker.progression.level,
            experience: worker.progression.experience,
            salary: worker.progression.salary,
            role: worker.primary_role().map_or(NO_ROLE, Role::name).to_string(),
            zone: worker.zone,
        }
    }

    pub fn to_worker(&self) -> Result<Worker, SaveError> {
        if self.level == 0 {
            return Err(SaveError::InvalidRecord(format!("worker {} has level 0", self.id)));
        }
        let skills = SkillSet::new(self.watering, self.harvesting, self.cashiering, self.security);
        let mut worker = Worker::new(self.id, self.name.clone(), skills, self.salary);
        worker.progression = Progression {
            level: self.level,
            experience: self.experience,
            salary: self.salary,
        };
        worker.zone = self.zone;

        if self.role != NO_ROLE {
            let role = Role::from_name(&self.role)
                .ok_or_else(|| SaveError::UnknownRole(self.role.clone()))?;
            worker.grant_role(role);
        }
        Ok(worker)
    }
}

/// Calendar position of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockRecord {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub elapsed_minutes: u64,
}

/// Serializable snapshot of the greenhouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub money: i64,
    pub clock: ClockRecord,
    pub grid_width: u32,
    pub grid_height: u32,
    pub statistics: Statistics,
    pub next_plant_id: u32,
    pub next_worker_id: u32,
    /// Row-major grid order.
    pub plants: Vec<PlantRecord>,
    /// Roster order.
    pub workers: Vec<WorkerRecord>,
}

/// Write a save document.
pub fn write_save<W: Write>(
    mut writer: W,
    data: &SaveData,
    format: SaveFormat,
) -> Result<(), SaveError> {
    match format {
        SaveFormat::Json => serde_json::to_writer_pretty(&mut writer, data)?,
        SaveFormat::Binary => bincode::serialize_into(&mut writer, data)?,
    }
    writer.flush()?;
    Ok(())
}

/// Read a save document and check its version.
pub fn read_save<R: Read>(reader: R, format: SaveFormat) -> Result<SaveData, SaveError> {
    let data: SaveData = match format {
        SaveFormat::Json => serde_json::from_reader(reader)?,
        SaveFormat::Binary => bincode::deserialize_from(reader)?,
    };

    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    Ok(data)
}

/// Errors that can occur during save/load
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("unknown plant type {0:?}")]
    UnknownPlantType(String),

    #[error("unknown plant state {0:?}")]
    UnknownState(String),

    #[error("unknown worker role {0:?}")]
    UnknownRole(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use templanter_logic::catalog::PlantKind;

    fn sample() -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            money: 321,
            clock: ClockRecord {
                day: 2,
                hour: 7,
                minute: 15,
                elapsed_minutes: 1515,
            },
            grid_width: 3,
            grid_height: 3,
            statistics: Statistics::default(),
            next_plant_id: 2,
            next_worker_id: 2,
            plants: vec![PlantRecord {
                id: 1,
                plant_type: "Rare Cactus".to_string(),
                x: 1,
                y: 2,
                state: "Growing".to_string(),
                growth: 42.5,
                water: 63.25,
                last_watered: 1400,
                decay_timer: 0.0,
            }],
            workers: vec![WorkerRecord {
                id: 1,
                name: "Rosa Reyes".to_string(),
                watering: 2,
                harvesting: 1,
                cashiering: 1,
                security: 2,
                level: 3,
                experience: 40,
                salary: 60,
                role: "Harvester".to_string(),
                zone: Some(1),
            }],
        }
    }

    #[test]
    fn test_plant_record_uses_type_key() {
        let json = serde_json::to_value(&sample().plants[0]).unwrap();
        assert_eq!(json["type"], "Rare Cactus");
        assert_eq!(json["state"], "Growing");
        assert!(json.get("plant_type").is_none());
    }

    #[test]
    fn test_record_conversion() {
        let catalog = Catalog::builtin();
        let data = sample();

        let plant = data.plants[0].to_plant(&catalog).unwrap();
        assert_eq!(plant.kind, PlantKind::Cactus);
        assert_eq!(plant.stage, GrowthStage::Growing);
        assert_eq!(PlantRecord::from_plant(&plant, &catalog), data.plants[0]);

        let worker = data.workers[0].to_worker().unwrap();
        assert_eq!(worker.primary_role(), Some(Role::Harvester));
        assert_eq!(worker.progression.level, 3);
        assert_eq!(WorkerRecord::from_worker(&worker), data.workers[0]);
    }

    #[test]
    fn test_decay_timer_survives_conversion() {
        let catalog = Catalog::builtin();
        let mut record = sample().plants[0].clone();
        record.state = "Decaying".to_string();
        record.growth = 100.0;
        record.decay_timer = 125.5;

        let plant = record.to_plant(&catalog).unwrap();
        assert_eq!(plant.stage, GrowthStage::Decaying);
        assert_eq!(plant.decay_timer, 125.5);
        assert_eq!(PlantRecord::from_plant(&plant, &catalog), record);

        record.decay_timer = f32::NAN;
        assert!(matches!(record.to_plant(&catalog), Err(SaveError::InvalidRecord(_))));
    }

    #[test]
    fn test_decay_timer_defaults_to_zero() {
        let mut json = serde_json::to_value(&sample().plants[0]).unwrap();
        json.as_object_mut().unwrap().remove("decay_timer");
        let record: PlantRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.decay_timer, 0.0);
        assert_eq!(record, sample().plants[0]);
    }

    #[test]
    fn test_roleless_worker_saves_none() {
        let mut record = sample().workers[0].clone();
        record.role = "None".to_string();
        let worker = record.to_worker().unwrap();
        assert!(worker.roles.is_empty());
        assert_eq!(WorkerRecord::from_worker(&worker).role, "None");
    }

    #[test]
    fn test_bad_records() {
        let catalog = Catalog::builtin();
        let mut plant = sample().plants[0].clone();
        plant.plant_type = "Triffid".to_string();
        assert!(matches!(plant.to_plant(&catalog), Err(SaveError::UnknownPlantType(_))));

        let mut plant = sample().plants[0].clone();
        plant.state = "Wilted".to_string();
        assert!(matches!(plant.to_plant(&catalog), Err(SaveError::UnknownState(_))));

        let mut worker = sample().workers[0].clone();
        worker.role = "Gardener".to_string();
        assert!(matches!(worker.to_worker(), Err(SaveError::UnknownRole(_))));
    }

    #[test]
    fn test_save_load_roundtrip_both_formats() {
        for format in [SaveFormat::Json, SaveFormat::Binary] {
            let mut buffer = Vec::new();
            write_save(&mut buffer, &sample(), format).expect("Save failed");
            let loaded = read_save(&buffer[..], format).expect("Load failed");
            assert_eq!(loaded, sample());
        }
    }

    #[test]
    fn test_version_mismatch() {
        let mut data = sample();
        data.version = 99;
        let mut buffer = Vec::new();
        write_save(&mut buffer, &data, SaveFormat::Json).unwrap();
        assert!(matches!(
            read_save(&buffer[..], SaveFormat::Json),
            Err(SaveError::VersionMismatch { expected: 1, found: 99 })
        ));
    }
}
