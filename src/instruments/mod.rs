pub mod types;
pub mod vanilla;

pub use types::{ExerciseStyle, OptionType, UnderlyingClass};
pub use vanilla::VanillaOption;
