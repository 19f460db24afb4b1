pub mod admins;
pub mod auth;
pub mod groups;
pub mod health;
pub mod students;
pub mod teachers;
pub mod users;
