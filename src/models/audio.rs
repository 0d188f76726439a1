use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown audio track '{0}'")]
pub struct ParseAudioTrackError(String);

/// Audio track selector for stream resolution. Subtitled is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioTrack {
    #[default]
    Sub,
    Dub,
}

impl AudioTrack {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sub => "sub",
            Self::Dub => "dub",
        }
    }
}

impl FromStr for AudioTrack {
    type Err = ParseAudioTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sub" => Ok(Self::Sub),
            "dub" => Ok(Self::Dub),
            other => Err(ParseAudioTrackError(other.to_string())),
        }
    }
}
