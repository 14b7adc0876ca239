pub mod config_io;
pub mod kv;
pub mod logging;
pub mod recovery;
pub mod site_io;
pub mod state;
