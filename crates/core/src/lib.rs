#![deny(warnings)]

pub mod classify;
pub mod config;
pub mod detect;
pub mod locale;
pub mod pipeline;
pub mod preprocess;
pub mod render;
pub mod translate;
