use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Hue used for negative correlations (blue).
const COOL_HUE: f32 = 225.0;
/// Hue used for positive correlations (red).
const WARM_HUE: f32 = 5.0;

/// Map a correlation in `[-1, 1]` to a cool-warm colour: blue for negative,
/// red for positive, near-white around zero. Undefined values are grey.
pub fn correlation_color(r: Option<f64>) -> Color32 {
    let Some(r) = r.filter(|r| r.is_finite()) else {
        return Color32::GRAY;
    };
    let strength = r.clamp(-1.0, 1.0).abs() as f32;
    let hue = if r < 0.0 { COOL_HUE } else { WARM_HUE };
    let hsl = Hsl::new(hue, 0.15 + 0.6 * strength, 0.95 - 0.45 * strength);
    to_color32(hsl.into_color())
}

/// Text colour that stays readable on top of [`correlation_color`].
pub fn label_color(r: Option<f64>) -> Color32 {
    match r {
        Some(r) if r.abs() > 0.6 => Color32::WHITE,
        _ => Color32::BLACK,
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_picks_the_hue() {
        let pos = correlation_color(Some(1.0));
        let neg = correlation_color(Some(-1.0));
        assert!(pos.r() > pos.b());
        assert!(neg.b() > neg.r());
    }

    #[test]
    fn zero_is_pale() {
        let c = correlation_color(Some(0.0));
        assert!(c.r() > 200 && c.g() > 200 && c.b() > 200);
    }

    #[test]
    fn undefined_is_grey() {
        assert_eq!(correlation_color(None), Color32::GRAY);
        assert_eq!(correlation_color(Some(f64::NAN)), Color32::GRAY);
    }
}
