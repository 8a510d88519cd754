pub mod ai;
pub mod entity;
pub mod error;
pub mod fov;
pub mod map;
pub mod pathing;
pub mod shadowcast;
pub mod tile;
