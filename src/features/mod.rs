pub mod categories;
pub mod cities;
pub mod contracts;
pub mod health;
pub mod photos;
pub mod properties;
pub mod users;
