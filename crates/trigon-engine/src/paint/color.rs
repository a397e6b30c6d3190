/// Straight-alpha linear RGBA color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Default clear color of the demo window.
    pub const SLATE: Color = Color::rgb(0.1, 0.2, 0.3);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Color used for a clear load op.
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Derives a color from a pointer position inside a surface.
    ///
    /// Red follows the horizontal position, green the vertical one; blue and
    /// alpha are kept from `self`. Both ratios are clamped to `[0, 1]`.
    pub fn from_pointer(self, pos: (f32, f32), size: (f32, f32)) -> Self {
        let ratio = |p: f32, extent: f32| {
            if extent > 0.0 {
                (p / extent).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        Self {
            r: ratio(pos.0, size.0),
            g: ratio(pos.1, size.1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_drives_red_and_green() {
        let c = Color::SLATE.from_pointer((200.0, 150.0), (800.0, 600.0));
        assert_eq!(c, Color::rgba(0.25, 0.25, 0.3, 1.0));
    }

    #[test]
    fn pointer_outside_is_clamped() {
        let c = Color::SLATE.from_pointer((-10.0, 900.0), (800.0, 600.0));
        assert_eq!((c.r, c.g), (0.0, 1.0));
    }

    #[test]
    fn zero_sized_surface_does_not_divide() {
        let c = Color::SLATE.from_pointer((5.0, 5.0), (0.0, 0.0));
        assert_eq!((c.r, c.g), (0.0, 0.0));
    }

    #[test]
    fn converts_to_wgpu_clear_color() {
        let c = Color::rgba(0.5, 0.25, 1.0, 0.75).to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 1.0, 0.75));
    }
}
