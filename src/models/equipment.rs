//! Equipment model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::enums::{EquipmentStatus, EquipmentType};

/// Equipment asset (reference data, immutable within a session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub serial_code: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    #[serde(default)]
    pub status: Option<EquipmentStatus>,
}

impl Equipment {
    /// Display label without the fleet prefix ("CAT 320 - EX-04" -> "EX-04")
    pub fn short_label(&self) -> &str {
        let mut parts = self.name.split(" - ");
        let first = parts.next().unwrap_or(&self.name);
        parts.next().unwrap_or(first).trim()
    }
}

/// Create equipment request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(custom(function = "not_blank", message = "Equipment name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub serial_code: Option<String>,
    pub status: EquipmentStatus,
}

/// Update equipment request (full replacement, as the backend expects)
pub type UpdateEquipment = CreateEquipment;

impl CreateEquipment {
    /// Trim free-text fields and drop an empty serial code
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.serial_code = self
            .serial_code
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
