pub mod auth;
pub mod site;
pub mod users;
