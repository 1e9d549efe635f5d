pub mod loans;
pub mod micro;
pub mod products;
