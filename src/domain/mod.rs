pub mod user;

pub use user::{CreateUser, Support, UpdateUser, User, UserListResponse, UserResponse};
