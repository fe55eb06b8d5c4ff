pub mod list;

pub use list::list as transaction_list;
