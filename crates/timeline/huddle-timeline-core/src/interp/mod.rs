//! Interpolation helpers shared by the resolver, the timeline and the display curve.

pub mod functions;

pub use functions::{
    catmull_rom_polyline, delay_fraction, effective_fraction, lerp_point, sample_path,
    MAX_DELAY_FRACTION,
};
