use bevy::input::keyboard::KeyCode;

/// Lowest offset that may be added to a fitted ortho size
pub const ORTHO_SIZE_OFFSET_MIN: f32 = -5.0;
/// Highest offset that may be added to a fitted ortho size
pub const ORTHO_SIZE_OFFSET_MAX: f32 = 5.0;

/// Re-runs the fit on every `OrthoSizeSetter` using its captured resolution
pub const REFIT_KEY: KeyCode = KeyCode::KeyF;

/// Shows or hides the `OrthoSizeSetter` inspector
pub const INSPECTOR_KEY: KeyCode = KeyCode::F2;
