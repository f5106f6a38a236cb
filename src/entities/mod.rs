pub mod sock;
