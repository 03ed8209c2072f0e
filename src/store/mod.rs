pub mod confirm;
pub mod load;
