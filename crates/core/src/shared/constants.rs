/// Search radius around the previous position, as a fraction of box size.
pub const DEFAULT_SEARCH_MARGIN: f64 = 0.5;

/// Lowest normalized cross-correlation accepted as a re-localization.
pub const DEFAULT_MIN_SCORE: f32 = 0.6;

/// Template blend factor applied after each successful update.
pub const DEFAULT_LEARNING_RATE: f32 = 0.1;

/// Patches with luma variance below this are treated as flat and score 0.
pub const FLAT_PATCH_EPSILON: f32 = 1e-6;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
