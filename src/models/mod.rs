pub mod card;
pub mod commander;
pub mod price;
pub mod visit;

pub use card::*;
pub use commander::*;
pub use price::*;
pub use visit::*;
