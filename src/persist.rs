//! Saved widget state
//!
//! A [`SaveRecord`] is the flat JSON snapshot a host embeds in its own
//! document format. Loading tolerates records written by older builds by
//! backfilling missing fields, and refuses records from newer builds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attrs::{AttrValue, Justification, RestoreAttr};
use crate::units::UnitStyle;

/// Current record format version. Bump when the schema changes in a way
/// old builds cannot read.
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to parse record: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("record version {file_version} is newer than supported version {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },
}

/// One widget's persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub initial: f32,
    #[serde(default)]
    pub justification: Justification,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub initial_enabled: bool,
    #[serde(default)]
    pub unit_style: UnitStyle,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_param_type")]
    pub param_type: String,
}

fn default_active() -> bool {
    true
}

fn default_visible() -> bool {
    true
}

fn default_param_type() -> String {
    "float".to_string()
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: Self = serde_json::from_str(json)?;
        if record.version > RECORD_VERSION {
            return Err(RecordError::VersionTooNew {
                file_version: record.version,
                supported_version: RECORD_VERSION,
            });
        }
        Ok(record)
    }

    /// Payload published to the attribute store for one staggered restore
    /// step.
    pub fn restore_value(&self, attr: RestoreAttr) -> AttrValue {
        match attr {
            RestoreAttr::Range => AttrValue::FloatList(vec![self.min, self.max]),
            RestoreAttr::Initial => AttrValue::Float(self.initial),
            RestoreAttr::InitialEnabled => AttrValue::Bool(self.initial_enabled),
            RestoreAttr::UnitStyle => AttrValue::Text(self.unit_style.name().to_string()),
            RestoreAttr::Visible => AttrValue::Bool(self.visible),
            RestoreAttr::ParamType => AttrValue::Text(self.param_type.clone()),
        }
    }
}
