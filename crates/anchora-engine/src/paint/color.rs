use crate::error::{Error, Result};

/// Number of channels in an RGBA color.
pub const CHANNELS: usize = 4;

/// Straight-alpha RGBA color.
///
/// Invariant (checked by [`Color::try_new`] and [`validate_color`]):
/// - every channel lies in `[0.0, 1.0]`; NaN is out of range.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    /// Unchecked constructor for constants.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color, rejecting any channel outside `[0, 1]`.
    pub fn try_new(r: f32, g: f32, b: f32, a: f32) -> Result<Self> {
        let rgba = validate_color(&[r, g, b, a])?;
        Ok(Self::from(rgba))
    }

    /// Creates a color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; CHANNELS] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; CHANNELS]> for Color {
    #[inline]
    fn from([r, g, b, a]: [f32; CHANNELS]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for wgpu::Color {
    #[inline]
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[inline]
pub(crate) fn channel_in_range(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Checks a caller-supplied color slice.
///
/// Fails with `InvalidArgument` unless there are exactly four channels, then
/// with `ColorRange` on the first channel outside `[0, 1]`.
pub fn validate_color(color: &[f32]) -> Result<[f32; CHANNELS]> {
    let rgba: [f32; CHANNELS] = color.try_into().map_err(|_| {
        Error::invalid(format!(
            "color must have {CHANNELS} channels (RGBA), got {}",
            color.len()
        ))
    })?;

    if let Some((channel, &value)) = rgba.iter().enumerate().find(|(_, v)| !channel_in_range(**v)) {
        return Err(Error::ColorRange { channel, value });
    }

    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_inclusive_bounds() {
        assert_eq!(validate_color(&[0.0, 1.0, 0.0, 1.0]), Ok([0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn reports_first_offending_channel() {
        let err = validate_color(&[1.5, 0.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(err, Error::ColorRange { channel: 0, value: 1.5 });

        let err = validate_color(&[0.0, 0.5, -0.25, 2.0]).unwrap_err();
        assert_eq!(err, Error::ColorRange { channel: 2, value: -0.25 });
    }

    #[test]
    fn nan_is_out_of_range() {
        let err = validate_color(&[0.0, f32::NAN, 0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::ColorRange { channel: 1, value } if value.is_nan()));
    }

    #[test]
    fn wrong_channel_count_is_invalid_argument() {
        assert_eq!(validate_color(&[1.0, 0.0, 0.0]).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            validate_color(&[1.0, 0.0, 0.0, 1.0, 1.0]).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn try_new_never_clamps() {
        assert!(Color::try_new(0.2, 0.4, 0.6, 1.0).is_ok());
        assert!(Color::try_new(0.2, 0.4, 1.01, 1.0).is_err());
    }

    #[test]
    fn srgb_bytes_map_to_unit_range() {
        let c = Color::from_srgb_u8(255, 0, 51, 255);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 1.0]);
    }
}
