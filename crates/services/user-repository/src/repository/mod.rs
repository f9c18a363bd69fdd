//! Repository layer for data access.

pub mod entities;
pub mod query;
mod user_repository;

pub use query::{SortDirection, UserColumn, UserFilter, UserQuery, UserSort};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use user_repository::MockUserRepository;
