pub mod geometry;
pub mod indices;
