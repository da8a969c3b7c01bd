#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
// #![warn(clippy::cargo)]

pub mod combine;
pub mod config;
pub mod constants;
pub(crate) mod error;
pub mod estimation;
pub mod gas;
pub mod ingest;
pub mod machine;
pub mod math;
pub mod physics;
pub mod series;
pub mod smoothing;

pub use error::Error;

pub type Result<T> = ::std::result::Result<T, Error>;
