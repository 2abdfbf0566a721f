pub mod rest_backend;
pub mod util;

pub use rest_backend::RestBackend;
