//! Domain types: raw observations, bid-curve wire shapes, delivery areas.

pub mod area;
pub mod order;
pub mod point;

pub use area::{all_areas, area, area_strict, Area, UnknownArea};
pub use order::{Curve, CurveOrder, CurvePoint, OrderHeader};
pub use point::{RawPoint, VolumeSample};
