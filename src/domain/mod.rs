pub mod currency;
pub mod listing;
pub mod product;

pub use currency::*;
pub use listing::*;
pub use product::*;
