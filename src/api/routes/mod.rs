pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pages;
pub mod results;
pub mod scans;
