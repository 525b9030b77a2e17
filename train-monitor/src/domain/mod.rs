//! Domain types for the delay monitor.
//!
//! These types represent validated announcement data. Invariants are
//! enforced at construction time, so code that receives them can trust
//! their validity.

mod departure;
mod train_id;

pub use departure::Departure;
pub use train_id::{InvalidTrainId, TrainId};
