// EduMon Schema - Shared type definitions
// Identifiers and catalog record types shared between the engine crate and
// the RON data files it embeds.

pub use catalog_data::*;
pub use ids::*;
pub use subjects::*;
pub use world_data::*;

pub mod catalog_data;
pub mod ids;
pub mod subjects;
pub mod world_data;
