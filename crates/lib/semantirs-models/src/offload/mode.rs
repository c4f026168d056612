use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// The optional stages an offload mode switches on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub compression: bool,
    pub beamforming: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OffloadMode {
    Raw,
    Semantic,
    SemanticIrs,
}

impl OffloadMode {
    pub const ALL: [OffloadMode; 3] = [
        OffloadMode::Raw,
        OffloadMode::Semantic,
        OffloadMode::SemanticIrs,
    ];

    pub fn capabilities(&self) -> Capabilities {
        match self {
            OffloadMode::Raw => Capabilities {
                compression: false,
                beamforming: false,
            },
            OffloadMode::Semantic => Capabilities {
                compression: true,
                beamforming: false,
            },
            OffloadMode::SemanticIrs => Capabilities {
                compression: true,
                beamforming: true,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OffloadMode::Raw => "raw",
            OffloadMode::Semantic => "semantic",
            OffloadMode::SemanticIrs => "semantic_irs",
        }
    }

    /// Column heading used in the comparison tables.
    pub fn label(&self) -> &'static str {
        match self {
            OffloadMode::Raw => "Raw (No IRS)",
            OffloadMode::Semantic => "Semantic (No IRS)",
            OffloadMode::SemanticIrs => "Semantic + IRS",
        }
    }
}

impl fmt::Display for OffloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OffloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(OffloadMode::Raw),
            "semantic" => Ok(OffloadMode::Semantic),
            "semantic_irs" => Ok(OffloadMode::SemanticIrs),
            _ => Err(format!(
                "unknown offload mode {}, supported: raw, semantic, semantic_irs",
                s
            )),
        }
    }
}
