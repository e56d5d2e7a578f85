pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod explorer;
pub mod filter;
pub mod search;
pub mod seasons;
pub mod timeline;
