pub mod contributions;
pub mod health;
