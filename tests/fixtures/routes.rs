//! Known polylines.

use route_pins::GeoPoint;

/// The published example of the encoded polyline format.
pub const CANONICAL_ENCODED: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub const CANONICAL_POINTS: &[GeoPoint] = &[
    GeoPoint::new(38.5, -120.2),
    GeoPoint::new(40.7, -120.95),
    GeoPoint::new(43.252, -126.453),
];

/// Start and end of the demo drive.
pub const DEMO_ORIGIN: GeoPoint = GeoPoint::new(33.9854893, -5.1813223);
pub const DEMO_DESTINATION: GeoPoint = GeoPoint::new(33.8810713, -5.5730396);

/// A short made-up route between the demo endpoints, at precision 5.
pub const DEMO_ROUTE: &[GeoPoint] = &[
    GeoPoint::new(33.98549, -5.18132),
    GeoPoint::new(33.97012, -5.20455),
    GeoPoint::new(33.95321, -5.25001),
    GeoPoint::new(33.93377, -5.31234),
    GeoPoint::new(33.91802, -5.38760),
    GeoPoint::new(33.90155, -5.45012),
    GeoPoint::new(33.88107, -5.57304),
];
