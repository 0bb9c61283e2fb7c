pub mod cue;
pub mod screens;
