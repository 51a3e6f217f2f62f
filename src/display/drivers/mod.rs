// src/display/drivers/mod.rs

pub mod console;
pub mod headless;

pub use console::ConsoleDisplay;
pub use headless::HeadlessDisplay;
