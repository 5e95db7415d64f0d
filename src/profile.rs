use crate::constants::{CUSTOM_TAG, MAX_QUALITY, MAX_SCALE, MIN_QUALITY};
use crate::error::{CompressionError, Result};
use crate::formats::{OutputFormat, TargetFormat};
use std::fmt;
use std::str::FromStr;

/// Named compression presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionProfile {
    Leve,
    #[default]
    Moderado,
    Agressivo,
}

/// Parameters a profile supplies when no override is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileDefaults {
    pub quality: u8,
    pub scale: f64,
    pub keep_metadata: bool,
    pub target_format: TargetFormat,
}

impl CompressionProfile {
    pub const ALL: [CompressionProfile; 3] = [
        CompressionProfile::Leve,
        CompressionProfile::Moderado,
        CompressionProfile::Agressivo,
    ];

    pub const fn defaults(self) -> ProfileDefaults {
        match self {
            CompressionProfile::Leve => ProfileDefaults {
                quality: 85,
                scale: 1.0,
                keep_metadata: true,
                target_format: TargetFormat::Auto,
            },
            CompressionProfile::Moderado => ProfileDefaults {
                quality: 70,
                scale: 0.8,
                keep_metadata: false,
                target_format: TargetFormat::Auto,
            },
            CompressionProfile::Agressivo => ProfileDefaults {
                quality: 50,
                scale: 0.6,
                keep_metadata: false,
                target_format: TargetFormat::Fixed(OutputFormat::WebP),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompressionProfile::Leve => "leve",
            CompressionProfile::Moderado => "moderado",
            CompressionProfile::Agressivo => "agressivo",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CompressionProfile::Leve => "light compression (high quality)",
            CompressionProfile::Moderado => "moderate compression (balanced)",
            CompressionProfile::Agressivo => "aggressive compression (smallest size)",
        }
    }
}

impl fmt::Display for CompressionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CompressionProfile {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        CompressionProfile::ALL
            .into_iter()
            .find(|profile| profile.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CompressionError::configuration(
                    "mode",
                    format!("'{}' is not one of leve, moderado, agressivo", s),
                )
            })
    }
}

/// Explicit values that replace a profile's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub quality: Option<u8>,
    pub scale: Option<f64>,
    pub target_format: Option<TargetFormat>,
    pub keep_metadata: Option<bool>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.quality.is_none()
            && self.scale.is_none()
            && self.target_format.is_none()
            && self.keep_metadata.is_none()
    }
}

/// Fully resolved parameters for one run.
///
/// Built once by [`resolve`] and shared read-only by every file in the
/// batch. The only deferred decision is `TargetFormat::Auto`, settled per
/// file from the source format.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionPlan {
    quality: u8,
    scale: f64,
    keep_metadata: bool,
    target_format: TargetFormat,
    tag: String,
}

impl CompressionPlan {
    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn keep_metadata(&self) -> bool {
        self.keep_metadata
    }

    pub fn target_format(&self) -> TargetFormat {
        self.target_format
    }

    /// Suffix appended to output file stems.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for CompressionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quality={}, scale={}, keep_metadata={}, format={}",
            self.quality, self.scale, self.keep_metadata, self.target_format
        )
    }
}

pub fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(CompressionError::configuration(
            "quality",
            format!(
                "{} is out of range, must be between {} and {}",
                quality, MIN_QUALITY, MAX_QUALITY
            ),
        ));
    }
    Ok(quality)
}

pub fn validate_scale(scale: f64) -> Result<f64> {
    if !scale.is_finite() || scale <= 0.0 || scale > MAX_SCALE {
        return Err(CompressionError::configuration(
            "scale",
            format!("{} is out of range, must be greater than 0 and at most 1", scale),
        ));
    }
    Ok(scale)
}

/// Merges a profile with overrides into a concrete plan.
///
/// Overrides always win over the profile. Any invalid override fails the
/// whole resolution.
pub fn resolve(profile: CompressionProfile, overrides: &Overrides) -> Result<CompressionPlan> {
    let defaults = profile.defaults();

    let quality = match overrides.quality {
        Some(q) => validate_quality(q)?,
        None => defaults.quality,
    };
    let scale = match overrides.scale {
        Some(s) => validate_scale(s)?,
        None => defaults.scale,
    };

    let tag = if overrides.is_empty() {
        profile.name().to_string()
    } else {
        CUSTOM_TAG.to_string()
    };

    Ok(CompressionPlan {
        quality,
        scale,
        keep_metadata: overrides.keep_metadata.unwrap_or(defaults.keep_metadata),
        target_format: overrides.target_format.unwrap_or(defaults.target_format),
        tag,
    })
}
