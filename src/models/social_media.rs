//! Social media link model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported platforms, one link per platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Instagram,
    Telegram,
}

impl Platform {
    /// Two-letter code stored in the database
    pub fn code(&self) -> &'static str {
        match self {
            Platform::Facebook => "FB",
            Platform::Instagram => "IG",
            Platform::Telegram => "TG",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Telegram => "Telegram",
        };
        f.write_str(label)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FB" => Ok(Platform::Facebook),
            "IG" => Ok(Platform::Instagram),
            "TG" => Ok(Platform::Telegram),
            other => Err(format!("Unknown platform code: {}", other)),
        }
    }
}

/// Link to the school's page on a social platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialMedia {
    pub id: i64,
    pub platform: Platform,
    pub url: String,
}
