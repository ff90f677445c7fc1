//! Backend side of the GUI: command types and the worker thread serving them.

pub mod commands;
pub mod runtime;
