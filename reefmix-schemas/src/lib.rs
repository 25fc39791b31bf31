pub mod file_formats;
pub mod salt_mix;
pub mod tank;
pub mod water;
