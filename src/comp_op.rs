//! Blend modes for the scanline compositor.
//!
//! Every mode works on premultiplied [`Argb`] pixels. Formulas follow the
//! SVG/W3C compositing model, where `Sca`/`Dca` are premultiplied source and
//! destination channels and `Sa`/`Da` their alphas:
//!
//! ```text
//! Dca' = f(Sc, Dc) * Sa * Da + Sca * (1 - Da) + Dca * (1 - Sa)
//! Da'  = Sa + Da - Sa * Da
//! ```
//!
//! for the separable modes, and the Porter-Duff operators for the rest.

use crate::color::Argb;

// ============================================================================
// BlendMode
// ============================================================================

/// Compositing operator applied by the scanline compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal,
    Plus,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    /// Source replaces destination.
    Source,
    DestinationIn,
    DestinationOut,
    SourceAtop,
    Clear,
}

impl BlendMode {
    /// Whether a transparent source leaves the destination unchanged.
    ///
    /// For these modes partial coverage and opacity are applied by scaling
    /// the source. The others (`Source`, `DestinationIn`, `Clear`) affect
    /// the destination even where the source is transparent, so a weight
    /// below one interpolates between the old and the fully blended pixel.
    pub fn is_source_bounded(self) -> bool {
        !matches!(
            self,
            BlendMode::Source | BlendMode::DestinationIn | BlendMode::Clear
        )
    }

    /// Blend one premultiplied source pixel over one destination pixel.
    pub fn blend_pixel(self, d: Argb, s: Argb) -> Argb {
        match self {
            BlendMode::Normal => blend_normal(d, s),
            BlendMode::Plus => blend_plus(d, s),
            BlendMode::Multiply => separable(d, s, multiply_calc),
            BlendMode::Screen => blend_screen(d, s),
            BlendMode::Overlay => separable(d, s, overlay_calc),
            BlendMode::Darken => separable(d, s, darken_calc),
            BlendMode::Lighten => separable(d, s, lighten_calc),
            BlendMode::ColorDodge => separable(d, s, color_dodge_calc),
            BlendMode::ColorBurn => separable(d, s, color_burn_calc),
            BlendMode::HardLight => separable(d, s, hard_light_calc),
            BlendMode::SoftLight => separable(d, s, soft_light_calc),
            BlendMode::Difference => separable(d, s, difference_calc),
            BlendMode::Exclusion => separable(d, s, exclusion_calc),
            BlendMode::Source => s,
            BlendMode::DestinationIn => d * s.a,
            BlendMode::DestinationOut => d * (1.0 - s.a),
            BlendMode::SourceAtop => blend_source_atop(d, s),
            BlendMode::Clear => Argb::TRANSPARENT,
        }
    }

    /// Blend `s` over `d` with the source weighted by `weight` in `[0, 1]`.
    #[inline]
    pub fn blend_pixel_weighted(self, d: Argb, s: Argb, weight: f32) -> Argb {
        if weight >= 1.0 {
            return self.blend_pixel(d, s);
        }
        if weight <= 0.0 {
            return d;
        }
        if self.is_source_bounded() {
            self.blend_pixel(d, s * weight)
        } else {
            d.lerp(&self.blend_pixel(d, s), weight)
        }
    }
}

// ============================================================================
// BlendOp trait
// ============================================================================

/// Composites runs of premultiplied pixels.
///
/// `dst` and `src` are processed pairwise up to the shorter length.
pub trait BlendOp {
    /// Blend `src` over `dst` at full opacity.
    fn blend(&self, dst: &mut [Argb], src: &[Argb]);

    /// Blend `src` over `dst`, weighting every source pixel by `opacity`.
    fn blend_with_opacity(&self, dst: &mut [Argb], src: &[Argb], opacity: f32);
}

impl BlendOp for BlendMode {
    fn blend(&self, dst: &mut [Argb], src: &[Argb]) {
        let mode = *self;
        for (d, s) in dst.iter_mut().zip(src) {
            *d = mode.blend_pixel(*d, *s);
        }
    }

    fn blend_with_opacity(&self, dst: &mut [Argb], src: &[Argb], opacity: f32) {
        let mode = *self;
        for (d, s) in dst.iter_mut().zip(src) {
            *d = mode.blend_pixel_weighted(*d, *s, opacity);
        }
    }
}

// ============================================================================
// Porter-Duff and non-separable helpers
// ============================================================================

// ---- Normal: Dca' = Sca + Dca.(1 - Sa)
#[inline]
fn blend_normal(d: Argb, s: Argb) -> Argb {
    if s.a >= 1.0 {
        return s;
    }
    s + d * (1.0 - s.a)
}

// ---- Plus: Dca' = Sca + Dca, clamped
#[inline]
fn blend_plus(d: Argb, s: Argb) -> Argb {
    let a = (d.a + s.a).min(1.0);
    Argb::new(
        a,
        (d.r + s.r).min(a),
        (d.g + s.g).min(a),
        (d.b + s.b).min(a),
    )
}

// ---- Screen: Dca' = Sca + Dca - Sca.Dca
#[inline]
fn blend_screen(d: Argb, s: Argb) -> Argb {
    Argb::new(
        s.a + d.a - s.a * d.a,
        s.r + d.r - s.r * d.r,
        s.g + d.g - s.g * d.g,
        s.b + d.b - s.b * d.b,
    )
    .clamped()
}

// ---- SourceAtop: Dca' = Sca.Da + Dca.(1 - Sa), Da' = Da
#[inline]
fn blend_source_atop(d: Argb, s: Argb) -> Argb {
    let s1a = 1.0 - s.a;
    Argb::new(
        d.a,
        s.r * d.a + d.r * s1a,
        s.g * d.a + d.g * s1a,
        s.b * d.a + d.b * s1a,
    )
}

// ============================================================================
// Separable modes
// ============================================================================

/// Per-channel blend function with signature
/// `(dca, sca, da, sa, sada, d1a, s1a) -> dca'`.
type ChannelCalc = fn(f32, f32, f32, f32, f32, f32, f32) -> f32;

#[inline]
fn separable(d: Argb, s: Argb, calc: ChannelCalc) -> Argb {
    if s.a <= 0.0 {
        return d;
    }
    let sada = s.a * d.a;
    let d1a = 1.0 - d.a;
    let s1a = 1.0 - s.a;
    Argb::new(
        s.a + d.a - sada,
        calc(d.r, s.r, d.a, s.a, sada, d1a, s1a),
        calc(d.g, s.g, d.a, s.a, sada, d1a, s1a),
        calc(d.b, s.b, d.a, s.a, sada, d1a, s1a),
    )
    .clamped()
}

// ---- Multiply: Sca.Dca + Sca.(1 - Da) + Dca.(1 - Sa)
#[inline]
fn multiply_calc(dca: f32, sca: f32, _da: f32, _sa: f32, _sada: f32, d1a: f32, s1a: f32) -> f32 {
    sca * dca + sca * d1a + dca * s1a
}

#[inline]
fn overlay_calc(dca: f32, sca: f32, da: f32, sa: f32, sada: f32, d1a: f32, s1a: f32) -> f32 {
    if 2.0 * dca <= da {
        2.0 * sca * dca + sca * d1a + dca * s1a
    } else {
        sada - 2.0 * (da - dca) * (sa - sca) + sca * d1a + dca * s1a
    }
}

// ---- Darken: min(Sca.Da, Dca.Sa) + Sca.(1 - Da) + Dca.(1 - Sa)
#[inline]
fn darken_calc(dca: f32, sca: f32, da: f32, sa: f32, _sada: f32, d1a: f32, s1a: f32) -> f32 {
    (sca * da).min(dca * sa) + sca * d1a + dca * s1a
}

// ---- Lighten: max(Sca.Da, Dca.Sa) + Sca.(1 - Da) + Dca.(1 - Sa)
#[inline]
fn lighten_calc(dca: f32, sca: f32, da: f32, sa: f32, _sada: f32, d1a: f32, s1a: f32) -> f32 {
    (sca * da).max(dca * sa) + sca * d1a + dca * s1a
}

#[inline]
fn color_dodge_calc(dca: f32, sca: f32, da: f32, sa: f32, sada: f32, d1a: f32, s1a: f32) -> f32 {
    if dca <= 0.0 {
        sca * d1a
    } else if sca < sa {
        sada * (1.0f32).min((dca / da) * sa / (sa - sca)) + sca * d1a + dca * s1a
    } else {
        sada + sca * d1a + dca * s1a
    }
}

#[inline]
fn color_burn_calc(dca: f32, sca: f32, da: f32, sa: f32, sada: f32, d1a: f32, s1a: f32) -> f32 {
    if dca >= da {
        sada + sca * d1a + dca * s1a
    } else if sca > 0.0 {
        sada * (1.0 - (1.0f32).min((1.0 - dca / da) * sa / sca)) + sca * d1a + dca * s1a
    } else {
        dca * s1a + sca * d1a
    }
}

#[inline]
fn hard_light_calc(dca: f32, sca: f32, da: f32, sa: f32, sada: f32, d1a: f32, s1a: f32) -> f32 {
    if 2.0 * sca <= sa {
        2.0 * sca * dca + sca * d1a + dca * s1a
    } else {
        sada - 2.0 * (da - dca) * (sa - sca) + sca * d1a + dca * s1a
    }
}

#[inline]
fn soft_light_calc(dca: f32, sca: f32, da: f32, sa: f32, _sada: f32, d1a: f32, s1a: f32) -> f32 {
    let m = if da > 0.0 { dca / da } else { 0.0 };
    let mix = if 2.0 * sca <= sa {
        dca * sa - (sa - 2.0 * sca) * dca * (1.0 - m)
    } else {
        let g = if 4.0 * m <= 1.0 {
            ((16.0 * m - 12.0) * m + 4.0) * m
        } else {
            m.sqrt()
        };
        dca * sa + da * (2.0 * sca - sa) * (g - m)
    };
    mix + sca * d1a + dca * s1a
}

// ---- Difference: Sca + Dca - 2.min(Sca.Da, Dca.Sa)
#[inline]
fn difference_calc(dca: f32, sca: f32, da: f32, sa: f32, _sada: f32, _d1a: f32, _s1a: f32) -> f32 {
    sca + dca - 2.0 * (sca * da).min(dca * sa)
}

// ---- Exclusion: (Sca.Da + Dca.Sa - 2.Sca.Dca) + Sca.(1 - Da) + Dca.(1 - Sa)
#[inline]
fn exclusion_calc(dca: f32, sca: f32, da: f32, sa: f32, _sada: f32, d1a: f32, s1a: f32) -> f32 {
    (sca * da + dca * sa - 2.0 * sca * dca) + sca * d1a + dca * s1a
}
