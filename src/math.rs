//! Math function wrappers for std/no_std compatibility
//!
//! Uses standard library math when available, falls back to libm for no_std.

#[cfg(feature = "std")]
#[inline]
pub fn ln(x: f64) -> f64 {
    x.ln()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn ln(x: f64) -> f64 {
    libm::log(x)
}

#[cfg(feature = "membership")]
#[cfg(feature = "std")]
#[inline]
pub fn exp(x: f64) -> f64 {
    x.exp()
}

#[cfg(feature = "membership")]
#[cfg(not(feature = "std"))]
#[inline]
pub fn exp(x: f64) -> f64 {
    libm::exp(x)
}

#[cfg(feature = "cardinality")]
#[cfg(feature = "std")]
#[inline]
pub fn log2(x: f64) -> f64 {
    x.log2()
}

#[cfg(feature = "cardinality")]
#[cfg(not(feature = "std"))]
#[inline]
pub fn log2(x: f64) -> f64 {
    libm::log2(x)
}

#[cfg(feature = "cardinality")]
#[cfg(feature = "std")]
#[inline]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(feature = "cardinality")]
#[cfg(not(feature = "std"))]
#[inline]
pub fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn ceil(x: f64) -> f64 {
    x.ceil()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn ceil(x: f64) -> f64 {
    libm::ceil(x)
}

/// Round half away from zero
#[cfg(feature = "membership")]
#[cfg(feature = "std")]
#[inline]
pub fn round(x: f64) -> f64 {
    x.round()
}

#[cfg(feature = "membership")]
#[cfg(not(feature = "std"))]
#[inline]
pub fn round(x: f64) -> f64 {
    libm::round(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn powi(x: f64, n: i32) -> f64 {
    x.powi(n)
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn powi(x: f64, n: i32) -> f64 {
    libm::pow(x, n as f64)
}

/// 2^-n for a register value, built straight from the exponent bits
#[cfg(feature = "cardinality")]
#[inline]
pub fn inv_pow2(n: u8) -> f64 {
    f64::from_bits(1.0f64.to_bits() - ((n as u64) << 52))
}
