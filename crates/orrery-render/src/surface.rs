//! Window size tracking for surface reconfiguration.
//!
//! A minimized window reports 0×0 on most platforms. The tracker remembers
//! that state so the frame loop can skip rendering, while the GPU surface is
//! always configured with at least 1×1.

/// Smallest size the surface is ever configured with.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Last known inner size of the window in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
    minimized: bool,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_SURFACE_DIMENSION),
            height: height.max(MIN_SURFACE_DIMENSION),
            minimized: width == 0 || height == 0,
        }
    }

    /// Records a new window size. Returns the clamped size if it differs from
    /// the current one and the surface should be reconfigured.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.minimized = width == 0 || height == 0;
        if self.minimized {
            return None;
        }
        if width == self.width && height == self.height {
            return None;
        }
        self.width = width;
        self.height = height;
        Some((width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height, for the projection matrix.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Nothing can be presented while minimized.
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_size_and_aspect() {
        let size = SurfaceSize::new(1024, 768);
        assert_eq!((size.width(), size.height()), (1024, 768));
        assert!((size.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
        assert!(!size.is_minimized());
    }

    #[test]
    fn test_zero_initial_size_is_clamped_and_minimized() {
        let size = SurfaceSize::new(0, 0);
        assert_eq!((size.width(), size.height()), (1, 1));
        assert!(size.is_minimized());
        assert!(size.aspect_ratio().is_finite());
    }

    #[test]
    fn test_resize_reports_change_once() {
        let mut size = SurfaceSize::new(800, 600);
        assert_eq!(size.handle_resize(1920, 1080), Some((1920, 1080)));
        assert_eq!(size.handle_resize(1920, 1080), None);
    }

    #[test]
    fn test_minimize_keeps_last_size() {
        let mut size = SurfaceSize::new(800, 600);
        assert_eq!(size.handle_resize(0, 0), None);
        assert!(size.is_minimized());
        assert_eq!((size.width(), size.height()), (800, 600));

        // Restoring to the same size clears the flag without a reconfigure.
        assert_eq!(size.handle_resize(800, 600), None);
        assert!(!size.is_minimized());
    }

    #[test]
    fn test_restore_from_minimized_at_new_size() {
        let mut size = SurfaceSize::new(0, 0);
        assert_eq!(size.handle_resize(1024, 768), Some((1024, 768)));
        assert!(!size.is_minimized());
    }
}
