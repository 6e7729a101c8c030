use palette::Srgb;

// ---------------------------------------------------------------------------
// Correlation colour scale
// ---------------------------------------------------------------------------

/// Colour of a strong positive correlation.
pub const POSITIVE: Srgb<u8> = Srgb::new(211, 37, 37);
/// Colour of a strong negative correlation.
pub const NEGATIVE: Srgb<u8> = Srgb::new(44, 110, 211);
/// Colour of no correlation.
pub const NEUTRAL: Srgb<u8> = Srgb::new(240, 240, 240);

/// Maps a correlation coefficient onto a diverging red/blue scale.
///
/// Coefficients whose magnitude exceeds `threshold` saturate to the end
/// colour; weaker ones fade linearly towards [`NEUTRAL`] as |r| drops to 0.
/// `NaN` has no colour.
pub fn correlation_color(coefficient: f64, threshold: f64) -> Option<Srgb<u8>> {
    if coefficient.is_nan() {
        return None;
    }
    let strong = if coefficient > 0.0 { POSITIVE } else { NEGATIVE };
    let magnitude = coefficient.abs();
    if magnitude > threshold {
        return Some(strong);
    }

    let norm = (1.0 - magnitude as f32).clamp(0.0, 1.0);
    let channel = |from: u8, to: u8| -> u8 {
        // truncates toward zero like the integer cast of the delta
        let delta = (norm * (i32::from(to) - i32::from(from)) as f32) as i32;
        (i32::from(from) + delta).clamp(0, 255) as u8
    };
    Some(Srgb::new(
        channel(strong.red, NEUTRAL.red),
        channel(strong.green, NEUTRAL.green),
        channel(strong.blue, NEUTRAL.blue),
    ))
}

/// `#rrggbb` form of a colour.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}
