use super::{
    PersistenceError, PersistenceResult, PresetStore, normalize_preset_name, validate_preset,
};
use crate::{Planner, SessionSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Default, Serialize, Deserialize)]
#[serde(transparent)]
struct PresetSnapshot {
    presets: BTreeMap<String, Planner>,
}

/// Presets kept in a single JSON object keyed by name.
///
/// Writes go to a sibling `.tmp` file that is renamed over the target, so a
/// reader never observes a half-written file.
pub struct JsonPresetStore {
    path: PathBuf,
}

impl JsonPresetStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> PersistenceResult<PresetSnapshot> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(PresetSnapshot::default());
            }
            Err(err) => return Err(err.into()),
        };
        let snapshot: PresetSnapshot = serde_json::from_reader(file)?;
        Ok(snapshot)
    }

    fn write_snapshot(&self, snapshot: &PresetSnapshot) -> PersistenceResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        {
            let mut file = File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, snapshot)?;
            file.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), presets = snapshot.presets.len(), "wrote presets");
        Ok(())
    }
}

impl PresetStore for JsonPresetStore {
    fn save_preset(&self, name: &str, planner: &Planner) -> PersistenceResult<()> {
        let name = normalize_preset_name(name)?;
        validate_preset(planner)?;
        let mut snapshot = self.read_snapshot()?;
        snapshot.presets.insert(name.to_string(), planner.clone());
        self.write_snapshot(&snapshot)
    }

    fn load_preset(&self, name: &str) -> PersistenceResult<Option<Planner>> {
        let name = normalize_preset_name(name)?;
        let mut snapshot = self.read_snapshot()?;
        let preset = snapshot.presets.remove(name);
        if let Some(planner) = &preset {
            validate_preset(planner)?;
        }
        Ok(preset)
    }

    fn list_presets(&self) -> PersistenceResult<Vec<String>> {
        Ok(self.read_snapshot()?.presets.into_keys().collect())
    }

    fn delete_preset(&self, name: &str) -> PersistenceResult<bool> {
        let name = normalize_preset_name(name)?;
        let mut snapshot = self.read_snapshot()?;
        if snapshot.presets.remove(name).is_none() {
            return Ok(false);
        }
        self.write_snapshot(&snapshot)?;
        Ok(true)
    }
}

#[derive(Serialize)]
struct SessionCsvRecord<'a> {
    index: u32,
    date: String,
    quantity: u32,
    work_label: &'a str,
    local_start: String,
    start_utc: String,
}

impl<'a> From<&'a SessionSlot> for SessionCsvRecord<'a> {
    fn from(slot: &'a SessionSlot) -> Self {
        Self {
            index: slot.index,
            date: slot.date.format("%Y-%m-%d").to_string(),
            quantity: slot.quantity,
            work_label: &slot.work_label,
            local_start: slot.local_start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            start_utc: slot.start_utc.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}

pub fn write_sessions_csv<W: Write>(slots: &[SessionSlot], writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for slot in slots {
        writer.serialize(SessionCsvRecord::from(slot))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_sessions_to_csv<P: AsRef<Path>>(
    slots: &[SessionSlot],
    path: P,
) -> PersistenceResult<()> {
    if slots.is_empty() {
        return Err(PersistenceError::InvalidData(
            "no sessions to export".into(),
        ));
    }
    let file = File::create(path)?;
    write_sessions_csv(slots, file)
}
