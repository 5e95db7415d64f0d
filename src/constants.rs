pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const MAX_SCALE: f64 = 1.0;

pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const HIGH_EFFORT_QUALITY_THRESHOLD: u8 = 70;

pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

/// libwebp effort, 0 (fast) to 6 (smallest output).
pub const WEBP_METHOD: i32 = 6;

/// Extensions picked up when enumerating a directory.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Output file tag used when any override was applied on top of the profile.
pub const CUSTOM_TAG: &str = "custom";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";
pub const PROGRESS_BAR_CHARS: &str = "=>-";

// Common output message prefixes
pub const START_PREFIX: &str = "🗜️ ";
pub const INPUT_PREFIX: &str = "📁";
pub const SUMMARY_PREFIX: &str = "📊";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️ ";
pub const ERROR_PREFIX: &str = "❌";
