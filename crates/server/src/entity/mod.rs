pub mod client;
pub mod email;
