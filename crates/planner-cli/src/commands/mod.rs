pub mod add;
pub mod delete;
pub mod done;
pub mod edit;
pub mod list;
pub mod next;
pub mod show;
