//! skygaze library
//!
//! This module exposes the data, cache and pipeline modules for use in
//! integration tests.

pub mod astro;
pub mod cache;
pub mod cli;
pub mod data;
pub mod night;
pub mod refresh;
pub mod seeing;
pub mod service;
