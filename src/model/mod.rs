pub mod article;
pub mod config;
pub mod idea;
pub mod site;
pub mod todo;

pub use article::*;
pub use config::*;
pub use idea::*;
pub use site::*;
pub use todo::*;
