#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use dental_3d as d3d;

#[doc(inline)]
pub use dental_metrics as metrics;

#[doc(inline)]
pub use dental_data as data;
