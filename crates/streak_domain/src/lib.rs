pub mod clock;
pub mod habit;
pub mod service;
pub mod store;

pub use crate::service::{HabitService, HabitServiceBuilder};
