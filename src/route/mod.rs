mod path;
mod poi;

pub use path::Route;
pub use poi::{local_normal, meters_to_degrees, place_poi, Poi, METERS_PER_DEGREE, TANGENT_WINDOW};
