pub mod auth_service;
pub mod factory;
pub mod guards;
pub mod identity;
pub mod metadata;
pub mod roles;
pub mod token_service;

pub use auth_service::{AuthService, SignInError};
pub use guards::{Credentials, GuardChain, GuardError, GuardInput};
pub use identity::Identity;
pub use metadata::{Annotations, HandlerRef, RouteMetadataReader};
pub use roles::Role;
pub use token_service::TokenService;
