pub mod article_ops;
pub mod auth;
pub mod calendar;
pub mod collection;
pub mod home;
pub mod idea_ops;
pub mod import;
pub mod reader_ops;
pub mod todo_ops;
