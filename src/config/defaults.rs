//! Default value functions for serde deserialization.

pub fn path_width() -> f32 {
    0.3
}

pub fn breadcrumb_period() -> f32 {
    0.3
}

pub fn target_depth() -> f32 {
    0.5
}

pub fn target_height() -> f32 {
    3.0
}

pub fn target_width() -> f32 {
    2.0
}

pub fn last_target_depth() -> f32 {
    1.0
}

pub fn last_target_width() -> f32 {
    1.0
}

pub fn close_radius() -> f32 {
    4.0
}

pub fn guidance_period() -> f32 {
    0.3
}

pub fn turn_warning_min_segment() -> f32 {
    6.0
}

pub fn vertical_slope_threshold() -> f32 {
    0.3
}

pub fn vertical_min_rise() -> f32 {
    1.0
}

pub fn heading_capacity() -> usize {
    50
}

pub fn required_distance() -> f32 {
    0.3
}

pub fn angle_deviation_threshold() -> f32 {
    0.2
}

pub fn linear_deviation_threshold() -> f32 {
    0.05
}

pub fn heading_period() -> f32 {
    0.01
}

pub fn waiting_period() -> f32 {
    5.0
}
