//! Scene state engine of the massing editor, plus the headless harness and
//! JSON command protocol used by integration tests and the CLI.

pub mod camera;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod solar;
pub mod state;
pub mod validation;
