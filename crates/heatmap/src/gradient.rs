/// One stop of the heat color scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    /// Normalized position in `[0, 1]`. Strictly increasing across the scale.
    pub at: f64,
    pub color: [u8; 3],
}

/// Fixed 11-stop heat scale from dark purple (0.0) to yellow (1.0).
pub const HEAT_GRADIENT: [GradientStop; 11] = [
    GradientStop { at: 0.0, color: [0x0d, 0x08, 0x87] },
    GradientStop { at: 0.1, color: [0x41, 0x04, 0x9d] },
    GradientStop { at: 0.2, color: [0x6a, 0x00, 0xa8] },
    GradientStop { at: 0.3, color: [0x8f, 0x0d, 0xa4] },
    GradientStop { at: 0.4, color: [0xb1, 0x2a, 0x90] },
    GradientStop { at: 0.5, color: [0xcc, 0x47, 0x78] },
    GradientStop { at: 0.6, color: [0xe1, 0x64, 0x62] },
    GradientStop { at: 0.7, color: [0xf2, 0x84, 0x4b] },
    GradientStop { at: 0.8, color: [0xfc, 0xa6, 0x36] },
    GradientStop { at: 0.9, color: [0xfc, 0xce, 0x25] },
    GradientStop { at: 1.0, color: [0xf0, 0xf9, 0x21] },
];

/// Interpolated scale color at normalized position `t` (clamped to `[0, 1]`).
pub fn color_at(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);

    let mut lower = HEAT_GRADIENT[0];
    for stop in HEAT_GRADIENT.iter().skip(1) {
        if t <= stop.at {
            let span = stop.at - lower.at;
            let frac = if span > 0.0 { (t - lower.at) / span } else { 0.0 };
            return [
                lerp_channel(lower.color[0], stop.color[0], frac),
                lerp_channel(lower.color[1], stop.color[1], frac),
                lerp_channel(lower.color[2], stop.color[2], frac),
            ];
        }
        lower = *stop;
    }
    HEAT_GRADIENT[HEAT_GRADIENT.len() - 1].color
}

/// Color for a raw `value` normalized against a pollutant's `max` statistic.
///
/// `value` is clamped to `[0, max]`; a non-positive `max` yields the first
/// stop. Returns a `#rrggbb` hex string for the rendering layer.
pub fn gradient_color(value: f64, max: f64) -> String {
    let t = if max > 0.0 {
        value.clamp(0.0, max) / max
    } else {
        0.0
    };
    let [r, g, b] = color_at(t);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}
