pub mod errors;
pub mod db;
pub mod base_status;
pub mod member;
pub mod member_credentials;
pub mod post;
pub mod tag;
pub mod experience;
pub mod file;

pub use base_status::BaseStatus;

#[cfg(test)]
mod tests;
