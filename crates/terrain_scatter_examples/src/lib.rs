#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    event_printer, render_layers_to_png, render_points_to_png, PointLayer, PointStyle,
    RenderConfig,
};
