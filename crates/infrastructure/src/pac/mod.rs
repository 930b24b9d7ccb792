//! The PAC evaluation engine: a throwaway Boa interpreter per call with the
//! Netscape helper surface installed as native functions.

pub mod engine;
mod helpers;
mod temporal;

pub use engine::BoaPacEngine;
