pub mod health;
pub mod socks;
