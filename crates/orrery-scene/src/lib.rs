//! Simulation state for the solar system: bodies, camera and lighting.
//!
//! Nothing here touches the GPU. The renderer reads [`Scene`] once per frame
//! through [`Scene::frame_matrices`] and [`Scene::body_transforms`].

pub mod body;
pub mod camera;
pub mod lighting;
pub mod scene;

pub use body::{Body, BodyDescriptor, SECONDS_PER_DAY, default_solar_system};
pub use camera::{CameraSettings, FlyCamera, MoveIntent};
pub use lighting::{LightToggle, LightingState, ShadingMode, disco_color};
pub use scene::{BodyTransform, FrameMatrices, Scene};
