//! TCP listening and connection dispatch.

pub mod listener;
