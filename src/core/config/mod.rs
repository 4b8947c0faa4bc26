pub mod data;
pub mod io;
pub mod keys;
pub mod printing;

#[cfg(test)]
mod tests;

pub use data::Config;
pub use io::ConfigError;
