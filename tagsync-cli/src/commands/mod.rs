pub mod groups;
pub mod put_shared;
