//! Orthographic fit: the size calculation, the camera component that applies it, and the
//! refit/inspector controls.

mod config;
mod constants;
mod ortho_size;
mod ortho_size_setter;

use bevy::prelude::*;

use config::OrthoFitControlsPlugin;
pub use constants::ORTHO_SIZE_OFFSET_MAX;
pub use constants::ORTHO_SIZE_OFFSET_MIN;
pub use ortho_size::FittingMode;
pub use ortho_size::OrthoSizeError;
pub use ortho_size::SizeOffset;
pub use ortho_size::TargetBounds;
pub use ortho_size::ViewportResolution;
pub use ortho_size::compute_ortho_size;
pub use ortho_size::fitted_ortho_size;
pub use ortho_size_setter::OrthoSizePlugin;
pub use ortho_size_setter::OrthoSizeSetter;
pub use ortho_size_setter::PendingOrthoFit;

/// [`OrthoSizePlugin`] plus keyboard refit (`F`) and the setter inspector (`F2`).
///
/// The inspector needs `EguiPlugin`; use [`OrthoSizePlugin`] alone for headless apps.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(OrthoSizePlugin)
            .add_plugins(OrthoFitControlsPlugin);
    }
}
