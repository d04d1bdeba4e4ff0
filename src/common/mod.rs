pub mod command;
pub mod compositor;
pub mod display_server;
pub mod fs;
pub mod paths;
