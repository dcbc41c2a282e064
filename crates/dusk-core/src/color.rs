//! RGB/HSL conversion and the darken policy.
//!
//! All functions are pure. Hue is in degrees, saturation and lightness are
//! percentages, RGB channels are in 0..=255.

/// Min/max-channel conversion. Each returned component is rounded to the
/// nearest integer; achromatic input yields `h = 0, s = 0`.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let d = max - min;
    let mut h = 0.0;
    let mut s = 0.0;
    if d != 0.0 {
        s = d / (1.0 - (2.0 * l - 1.0).abs());
        if max == r {
            h = 60.0 * (((g - b) / d) % 6.0);
            if b > g {
                h += 360.0;
            }
        } else if max == g {
            h = 60.0 * ((b - r) / d + 2.0);
        } else {
            h = 60.0 * ((r - g) / d + 4.0);
        }
    }

    (h.round(), (s * 100.0).round(), (l * 100.0).round())
}

/// Sextant-based reconstruction. Channels are returned unrounded in 0..=255;
/// callers round when they need integer channels.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h / 360.0;
    let s = s / 100.0;
    let l = l / 100.0;

    let mut r = l;
    let mut g = l;
    let mut b = l;

    let v = if l <= 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    if v > 0.0 {
        let m = l + l - v;
        let sv = (v - m) / v;
        let h = h * 6.0;
        let sextant = h.floor();
        let fract = h - sextant;
        let vsf = v * sv * fract;
        let mid1 = m + vsf;
        let mid2 = v - vsf;

        match sextant as i32 {
            0 => {
                r = v;
                g = mid1;
                b = m;
            }
            1 => {
                r = mid2;
                g = v;
                b = m;
            }
            2 => {
                r = m;
                g = v;
                b = mid1;
            }
            3 => {
                r = m;
                g = mid2;
                b = v;
            }
            4 => {
                r = mid1;
                g = m;
                b = v;
            }
            5 => {
                r = v;
                g = m;
                b = mid2;
            }
            _ => {}
        }
    }

    (r * 255.0, g * 255.0, b * 255.0)
}

/// Compute the dark-theme counterpart of `(h, s, l)`.
///
/// The new lightness is a near-inversion biased 10% toward light, so very
/// light colors land on a comfortably dark result instead of pitch black and
/// very dark colors land on a strongly light one. Fully achromatic input is
/// given a faint cool tint (h = 210, s = 10) to stay visible against a dark
/// background.
pub fn darken(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let increment = l / 100.0 * 10.0;
    let new_l = (100.0 - l + increment).min(100.0);

    if h + s == 0.0 {
        return (210.0, 10.0, new_l);
    }

    (h, s, new_l)
}
