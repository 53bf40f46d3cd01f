#![allow(dead_code, non_snake_case, non_upper_case_globals)]

pub mod utils;
pub mod error;
pub mod hilbert;
pub mod dynamics;
pub mod evolve;
pub mod spectral;
pub mod topology;
pub mod plot;
pub mod config;

pub use error::{ Error, Result };
