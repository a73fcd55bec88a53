//! Sanitising of the numeric text fields.

/// Parse one 0..=255 channel from a text field.
///
/// Out-of-range numbers clamp to the nearest bound. Anything that is not an integer,
/// including an empty field, resets the channel to 0.
pub fn parse_channel(text: &str) -> u8 {
    match text.trim().parse::<i64>() {
        Ok(value) => value.clamp(0, 255) as u8,
        Err(_) => 0,
    }
}

/// Parse the four alpha, red, green and blue fields.
pub fn parse_components(alpha: &str, red: &str, green: &str, blue: &str) -> [u8; 4] {
    [
        parse_channel(alpha),
        parse_channel(red),
        parse_channel(green),
        parse_channel(blue),
    ]
}
