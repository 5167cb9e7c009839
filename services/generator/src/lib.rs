//! Contour map generator: scattered or synthetic samples in, classified
//! GeoJSON polygons out.

pub mod features;
pub mod scatter;
pub mod synthetic;
