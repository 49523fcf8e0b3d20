#![allow(nonstandard_style)]

//! A three-token calculator over arbitrary-precision decimals that keeps a
//! size-capped history of every session.

pub mod config;
pub mod decimal;
pub mod error_handling;
pub mod evaluating;
pub mod history;
pub mod parsing;
pub mod session;

pub use decimal::Decimal;
pub use error_handling::{CalcError, Result};
pub use evaluating::evaluate;
