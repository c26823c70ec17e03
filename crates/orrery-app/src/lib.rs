//! Orrery application: window, event loop and frame phases.

pub mod body_assets;
pub mod frame_clock;
pub mod platform;
pub mod window;

pub use body_assets::load_body_assets;
pub use frame_clock::{FrameClock, FrameTime, STALL_THRESHOLD};
pub use platform::{APP_NAME, PlatformDirs, PlatformError};
pub use window::{AppError, AppState, FramePhase, run, window_attributes_from_config};
