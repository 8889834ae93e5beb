pub mod relay;
pub mod rooms;
