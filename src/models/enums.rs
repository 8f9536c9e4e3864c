use std::fmt;

use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(EntityKind {
    Patient => "patient",
    MedicalHistory => "medical_history",
    Allergy => "allergy",
    Medication => "medication",
    VitalSigns => "vital_signs",
    LabResult => "lab_result",
    Appointment => "appointment",
});

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment status. The label set is open and every label reads back
/// exactly as written: only the lowercase `scheduled`, `completed` and
/// `cancelled` map to named variants, anything else (`Completed`,
/// `canceled`, `no-show`) is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(label) => label,
        }
    }

    pub fn parse(label: &str) -> Self {
        match label {
            "scheduled" => Self::Scheduled,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}
