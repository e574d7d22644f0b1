pub mod math {
    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }
}

pub mod color {
    use glam::Vec4;

    /// Clamp every channel independently to `[0, 1]`.
    pub fn clamp(color: Vec4) -> Vec4 {
        color.clamp(Vec4::ZERO, Vec4::ONE)
    }

    /// Pack a normalized color into a RGBA8 pixel.
    ///
    /// Channels are scaled by 255 and truncated, red ends up in the lowest
    /// byte and alpha in the highest. The input is expected to be clamped.
    pub fn convert_rgba(color: Vec4) -> u32 {
        let r = (color.x * 255.0) as u8;
        let g = (color.y * 255.0) as u8;
        let b = (color.z * 255.0) as u8;
        let a = (color.w * 255.0) as u8;

        (a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
    }
}
