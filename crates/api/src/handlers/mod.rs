pub mod activities;
pub mod groups;
pub mod journal;
pub mod projects;
pub mod users;
