pub mod health;
pub mod routes;
pub mod users;

pub use routes::{create_router, AppState};
