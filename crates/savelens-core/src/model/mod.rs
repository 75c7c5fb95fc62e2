mod candidate;
mod enums;
mod location;
mod structure;

pub use candidate::*;
pub use enums::*;
pub use location::*;
pub use structure::*;
