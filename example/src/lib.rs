//! Small applications built on optkit.

pub mod greeter;
pub mod tester;
