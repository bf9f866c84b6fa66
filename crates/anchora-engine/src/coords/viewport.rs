/// Drawable size in logical pixels.
///
/// Uploaded to the program's viewport uniform; the vertex shader divides
/// positions by it to reach NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Size with each side raised to at least one pixel, as sent to the GPU.
    #[inline]
    pub fn clamped_size(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}
