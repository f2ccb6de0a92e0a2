//! 360 AI HIMASIF library exports for testing

pub mod core;
pub mod identity;
pub mod transport;
pub mod tui;

#[cfg(test)]
pub mod test_support;
