pub mod tier_check;
