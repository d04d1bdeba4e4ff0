use anyhow::Result;
use image::Rgba;

/// Parse `#rrggbb`, `rrggbb` or the short `#rgb` form into an opaque color.
pub fn parse_hex(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("invalid color '{s}', expected #rrggbb");
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => anyhow::bail!("invalid color '{s}', expected #rrggbb"),
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| anyhow::anyhow!("invalid color '{s}', expected #rrggbb"))
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
