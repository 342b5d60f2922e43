pub mod bootstrap;
pub mod wire;
