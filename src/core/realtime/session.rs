//! Session descriptor sent to the upstream API at call creation/acceptance.
//!
//! The descriptor is immutable and built fresh per call from the configured
//! [`SessionDefaults`]. The video capability is an optional extension of the
//! base record: it is serialized only when requested and toggling it never
//! changes the audio configuration.

use serde::{Deserialize, Serialize};

use crate::config::SessionDefaults;

/// Session type value for realtime call sessions.
pub const SESSION_TYPE_REALTIME: &str = "realtime";

/// Noise reduction mode applied to input audio.
pub const NOISE_REDUCTION_NEAR_FIELD: &str = "near_field";

/// Configuration payload describing model, voice and modality options for one
/// call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    #[serde(rename = "type")]
    pub session_type: String,
    pub model: String,
    pub instructions: String,
    pub audio: AudioConfig,
    /// Video capability, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub input: AudioInput,
    pub output: AudioOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInput {
    pub noise_reduction: NoiseReduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseReduction {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioOutput {
    pub voice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input: VideoInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInput {
    pub enabled: bool,
}

impl SessionDescriptor {
    /// Build a session descriptor from the configured defaults.
    ///
    /// Pure and deterministic; `video_enabled` toggles the optional video
    /// extension independently of the audio configuration.
    pub fn build(defaults: &SessionDefaults, video_enabled: bool) -> Self {
        Self {
            session_type: SESSION_TYPE_REALTIME.to_string(),
            model: defaults.model.clone(),
            instructions: defaults.instructions.clone(),
            audio: AudioConfig {
                input: AudioInput {
                    noise_reduction: NoiseReduction {
                        kind: NOISE_REDUCTION_NEAR_FIELD.to_string(),
                    },
                },
                output: AudioOutput {
                    voice: defaults.voice.clone(),
                },
            },
            video: video_enabled.then_some(VideoConfig {
                input: VideoInput { enabled: true },
            }),
        }
    }
}
