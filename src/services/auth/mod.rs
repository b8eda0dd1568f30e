pub mod access_jwt;
pub mod bearer;
pub mod error;
pub mod factory;
pub mod jwks;
pub mod permissions;

pub use access_jwt::{AuthService, Claims};
pub use error::{AuthError, InvalidHeader, MalformedHeader};
pub use factory::build_auth_service;
