//! Small numeric helpers shared across the acquisition pipeline
//!
//! All derived quantities (distances, levels, rates) are reported at
//! two-decimal precision: the resolution the sensors actually deliver.
//! Uses `libm` because `f32::round` is not available in `core`.

/// Round to two decimal places.
pub fn round2(value: f32) -> f32 {
    libm::roundf(value * 100.0) / 100.0
}
