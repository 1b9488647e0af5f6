//! Patient medical record supplied by the follow-up backend.
//!
//! The record is read-only here; [`crate::ui::patient_dialog`] renders it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "男")]
    Male,
    #[serde(rename = "女")]
    Female,
}

impl Gender {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Demographics shown in the first dialog section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    /// Centimetres.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub blood_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub condition: String,
    pub diagnosis_date: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub date: String,
    pub doctor: String,
    pub department: String,
    pub diagnosis: String,
    pub prescription: String,
}

/// Complete patient record. Missing lists deserialize as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub medical_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub consultations: Vec<Consultation>,
}

impl PatientInfo {
    #[must_use]
    pub fn history_count(&self) -> usize {
        self.medical_history.len()
    }

    #[must_use]
    pub fn medication_count(&self) -> usize {
        self.medications.len()
    }

    #[must_use]
    pub fn consultation_count(&self) -> usize {
        self.consultations.len()
    }
}
