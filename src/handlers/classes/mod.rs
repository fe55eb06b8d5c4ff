pub mod create;
pub mod delete;
pub mod list;
pub mod update;

// Re-export handler functions for use in routing
pub use create::create as class_create;
pub use delete::delete as class_delete;
pub use list::list as class_list;
pub use update::update as class_update;
