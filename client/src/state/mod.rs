pub mod render_order;
pub mod roster;
pub mod store;
