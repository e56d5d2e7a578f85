pub mod lifetime;
pub mod time;
