pub mod sock_import;
pub mod socks;
