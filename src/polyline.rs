//! Encoded polyline codec for route geometries.
//!
//! Routes arrive from the directions provider as Google encoded polyline
//! strings. This module converts between that compact ASCII form and decoded
//! coordinate sequences; everything past the boundary works on [`GeoPoint`]s.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;

/// Decimal digits kept per coordinate by the standard format (~1.1 m).
pub const DEFAULT_PRECISION: u32 = 5;

/// Largest precision at which a longitude of +/-180 still scales into `i32`.
pub const MAX_PRECISION: u32 = 7;

/// Offset that shifts every 5-bit group into printable ASCII.
const ASCII_OFFSET: u8 = 63;

/// Continuation flag set on every group except a value's last.
const CONTINUATION: u64 = 0x20;

const GROUP_MASK: u64 = 0x1f;

/// Widest zig-zagged delta `encode` can emit: two `i32` values apart, 33 bits,
/// carried in at most seven 5-bit groups.
const MAX_VALUE_BITS: u32 = 35;

/// Why a string could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The string ended while a value still had its continuation bit set.
    Truncated,
    /// A latitude was decoded with no longitude after it.
    MissingLongitude,
    /// A byte outside the encoded range `63..=126`.
    InvalidByte(u8),
    /// A single value used more groups than any encoded delta needs.
    Overlong,
    /// The running coordinate left the `i32` fixed-point range.
    Overflow,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::Truncated => write!(f, "string ends mid-value"),
            MalformedReason::MissingLongitude => write!(f, "latitude without longitude"),
            MalformedReason::InvalidByte(byte) => write!(f, "byte 0x{byte:02x} outside encoded range"),
            MalformedReason::Overlong => write!(f, "value longer than {MAX_VALUE_BITS} bits"),
            MalformedReason::Overflow => write!(f, "accumulated coordinate out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    #[error("point {index} {point} is not representable at precision {precision}")]
    InvalidInput {
        index: usize,
        point: GeoPoint,
        precision: u32,
    },
    #[error("precision {0} is not supported (max {max})", max = MAX_PRECISION)]
    UnsupportedPrecision(u32),
    #[error("malformed polyline at byte {position}: {reason}")]
    MalformedInput {
        position: usize,
        reason: MalformedReason,
    },
}

/// Decoded route geometry.
///
/// Providers hand out encoded strings; [`Polyline::decode`] and
/// [`Polyline::encode`] are the only places the two forms meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline at [`DEFAULT_PRECISION`].
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        decode(encoded, DEFAULT_PRECISION).map(Self::new)
    }

    /// Encodes the points at [`DEFAULT_PRECISION`].
    pub fn encode(&self) -> Result<String, PolylineError> {
        encode(&self.points, DEFAULT_PRECISION)
    }

    /// Waypoints in travel order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<GeoPoint>> for Polyline {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

fn scale_factor(precision: u32) -> Result<f64, PolylineError> {
    if precision > MAX_PRECISION {
        return Err(PolylineError::UnsupportedPrecision(precision));
    }
    Ok(10f64.powi(precision as i32))
}

/// Scales a coordinate to the fixed-point integer the format carries.
fn to_fixed(value: f64, factor: f64) -> Option<i64> {
    let scaled = (value * factor).round();
    if scaled.is_finite() && scaled >= i32::MIN as f64 && scaled <= i32::MAX as f64 {
        Some(scaled as i64)
    } else {
        None
    }
}

fn zigzag(value: i64) -> u64 {
    if value < 0 {
        !((value as u64) << 1)
    } else {
        (value as u64) << 1
    }
}

fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = zigzag(delta);
    while value >= CONTINUATION {
        out.push(((CONTINUATION | (value & GROUP_MASK)) as u8 + ASCII_OFFSET) as char);
        value >>= 5;
    }
    out.push((value as u8 + ASCII_OFFSET) as char);
}

/// Encodes `points` with Google's polyline algorithm.
///
/// Deltas are taken between rounded fixed-point values so rounding error does
/// not build up along the line. Fails without partial output if any
/// coordinate cannot be scaled into `i32` range.
pub fn encode(points: &[GeoPoint], precision: u32) -> Result<String, PolylineError> {
    let factor = scale_factor(precision)?;
    let mut out = String::with_capacity(points.len() * 8);
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

    for (index, point) in points.iter().enumerate() {
        let invalid = || PolylineError::InvalidInput {
            index,
            point: *point,
            precision,
        };
        let lat = to_fixed(point.lat, factor).ok_or_else(invalid)?;
        let lng = to_fixed(point.lng, factor).ok_or_else(invalid)?;

        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);

        prev_lat = lat;
        prev_lng = lng;
    }

    Ok(out)
}

/// Reads one zig-zagged value starting at `*cursor`.
fn read_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *cursor;
        let Some(&byte) = bytes.get(position) else {
            return Err(PolylineError::MalformedInput {
                position,
                reason: MalformedReason::Truncated,
            });
        };
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::MalformedInput {
                position,
                reason: MalformedReason::InvalidByte(byte),
            });
        }
        if shift >= MAX_VALUE_BITS {
            return Err(PolylineError::MalformedInput {
                position,
                reason: MalformedReason::Overlong,
            });
        }

        let chunk = u64::from(byte - ASCII_OFFSET);
        result |= (chunk & GROUP_MASK) << shift;
        shift += 5;
        *cursor += 1;

        if chunk & CONTINUATION == 0 {
            return Ok(unzigzag(result));
        }
    }
}

/// Adds a decoded delta, keeping the coordinate inside the range `encode` emits.
fn accumulate(total: i64, delta: i64, position: usize) -> Result<i64, PolylineError> {
    total
        .checked_add(delta)
        .filter(|sum| i32::try_from(*sum).is_ok())
        .ok_or(PolylineError::MalformedInput {
            position,
            reason: MalformedReason::Overflow,
        })
}

/// Decodes an encoded polyline into points, in encoding order.
///
/// All-or-nothing: any malformed byte sequence fails the whole call.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<GeoPoint>, PolylineError> {
    let factor = scale_factor(precision)?;
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 8);
    let mut cursor = 0;
    let (mut lat, mut lng) = (0i64, 0i64);

    while cursor < bytes.len() {
        let start = cursor;
        lat = accumulate(lat, read_value(bytes, &mut cursor)?, start)?;

        if cursor >= bytes.len() {
            return Err(PolylineError::MalformedInput {
                position: cursor,
                reason: MalformedReason::MissingLongitude,
            });
        }

        let start = cursor;
        lng = accumulate(lng, read_value(bytes, &mut cursor)?, start)?;

        points.push(GeoPoint::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(points)
}

/// Decodes many polylines in parallel; results keep input order.
pub fn decode_batch<S>(encoded: &[S], precision: u32) -> Vec<Result<Vec<GeoPoint>, PolylineError>>
where
    S: AsRef<str> + Sync,
{
    encoded
        .par_iter()
        .map(|line| decode(line.as_ref(), precision))
        .collect()
}

/// Encodes many point sequences in parallel; results keep input order.
pub fn encode_batch<P>(lines: &[P], precision: u32) -> Vec<Result<String, PolylineError>>
where
    P: AsRef<[GeoPoint]> + Sync,
{
    lines
        .par_iter()
        .map(|points| encode(points.as_ref(), precision))
        .collect()
}
