pub mod types;
pub mod validation;

pub use types::{DailyInputs, FootprintInputs, TransportMode, TravelMode, TreeSpecies};
pub use validation::{validate_inputs, validate_tree_age, InputError};
