pub mod bars;
pub mod buffer;
pub mod curve;
pub mod intersection;
pub mod items;
pub mod markers;
pub mod sample;
pub mod window;
