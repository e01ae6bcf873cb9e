//! gridboard
//!
//! Layout and positioning engine for a dashboard builder. Two modes:
//! tiled grid layouts picked from a fixed catalog, and free-floating
//! canvases where widgets are dragged and resized with the mouse.
//!
//! Pure core (`catalog`, `floating`, `model`) with side effects kept to the
//! store and the injected remote collaborators (`grid_size`, `positioning`,
//! `store`).

pub mod catalog;
pub mod config;
pub mod floating;
pub mod grid_size;
pub mod logging;
pub mod model;
pub mod positioning;
pub mod store;
