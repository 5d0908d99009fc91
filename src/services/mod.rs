pub mod actions;
pub mod api;
pub mod conversation;
pub mod credentials;
pub mod transport;
