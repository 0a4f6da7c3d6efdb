//! ortho_fit - fits an orthographic Bevy camera to a target's render bounds
//!
//! Add [`camera::CameraPlugin`] and put a [`camera::OrthoSizeSetter`] on a 2D camera. The setter
//! captures the primary window's resolution when inserted and sizes the camera once the target's
//! bounds are known.

pub mod camera;
