pub mod float_ext;
pub mod log_setup;

pub const EPSILON: f32 = 1e-6;
