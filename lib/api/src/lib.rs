//! HTTP surface for the Wardrobe catalog service

mod rest;

pub use rest::{configure, ApiState, RestApi};
