pub mod number;

pub use number::round2;
