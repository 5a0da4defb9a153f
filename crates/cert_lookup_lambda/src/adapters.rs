pub mod acm;
pub mod callback;
pub mod inventory;
