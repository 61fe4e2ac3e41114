//! Composite interaction choreography
//!
//! Fixed sequences of primitives that get one reliable effect out of a
//! widget which does not cooperate with scripted input.

mod ripple;
mod set_value;
mod wait;
