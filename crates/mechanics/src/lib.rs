pub mod error;
pub mod presets;
pub mod tire;
pub mod vehicle;
pub mod world;

pub use error::ConfigError;
pub use world::World;
