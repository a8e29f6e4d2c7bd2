mod compose;
mod overlay;

pub use compose::compose_mosaic;
pub use overlay::{draw_poi, draw_route, load_label_font};
