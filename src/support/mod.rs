pub mod clock;
pub mod format_float;

pub use clock::Clock;
pub use format_float::write_fixed;
