mod executor;
pub use executor::*;

mod temp;
pub use temp::*;
