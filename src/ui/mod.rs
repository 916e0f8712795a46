pub mod debug;
pub mod theme;
