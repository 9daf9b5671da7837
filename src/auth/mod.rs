pub mod credentials;
pub mod extractors;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod token;

// Re-export necessary items
pub use credentials::{validate_password, validate_username, CredentialError};
pub use extractors::AuthenticatedUserId;
pub use gate::{AuthError, AuthorizationGate, API_KEY_HEADER};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
