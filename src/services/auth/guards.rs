//! The guard chain: authentication, then authorization.
//!
//! Each stage takes the request context produced by the previous stage and
//! either returns the (possibly enriched) context or rejects the request.
//! The order is fixed in [`GuardChain::new`] and applies to every route.

use std::sync::Arc;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::services::auth::identity::Identity;
use crate::services::auth::metadata::RouteMetadata;
use crate::services::auth::token_service::{TokenError, TokenService};

/// What the caller presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    Missing,
    Bearer(&'a str),
    // Header present but not `Bearer <token>` (or not valid UTF-8)
    Unsupported,
}

impl<'a> Credentials<'a> {
    pub fn from_header(value: Option<&'a HeaderValue>) -> Self {
        let Some(value) = value else {
            return Self::Missing;
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.strip_prefix("Bearer "))
            .map_or(Self::Unsupported, Self::Bearer)
    }
}

/// Everything a guard may look at for one request.
#[derive(Debug, Clone, Copy)]
pub struct GuardInput<'a> {
    pub metadata: &'a RouteMetadata,
    pub credentials: Credentials<'a>,
}

/// Per-request carrier threaded through the stages and handed to the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_identity(self, identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn into_identity(self) -> Option<Identity> {
        self.identity
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    #[error("missing authorization header")]
    MissingCredentials,
    #[error("authorization header is not a bearer token")]
    UnsupportedScheme,
    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(UnauthenticatedReason),
    #[error("forbidden")]
    Forbidden,
    #[error("{stage} reached a role-restricted route without an identity")]
    InternalConsistency { stage: &'static str },
}

pub trait Guard: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(
        &self,
        input: &GuardInput<'_>,
        ctx: RequestContext,
    ) -> Result<RequestContext, GuardError>;
}

/// Resolves the caller's identity from the bearer token.
pub struct AuthenticationGuard {
    tokens: Arc<TokenService>,
}

impl AuthenticationGuard {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl Guard for AuthenticationGuard {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn check(
        &self,
        input: &GuardInput<'_>,
        ctx: RequestContext,
    ) -> Result<RequestContext, GuardError> {
        if input.metadata.is_public {
            return Ok(ctx);
        }

        let token = match input.credentials {
            Credentials::Bearer(token) => token,
            Credentials::Missing => {
                return Err(GuardError::Unauthenticated(
                    UnauthenticatedReason::MissingCredentials,
                ));
            }
            Credentials::Unsupported => {
                return Err(GuardError::Unauthenticated(
                    UnauthenticatedReason::UnsupportedScheme,
                ));
            }
        };

        let identity = self
            .tokens
            .verify(token)
            .map_err(|e| GuardError::Unauthenticated(e.into()))?;

        Ok(ctx.with_identity(identity))
    }
}

/// Matches the route's required roles against the identity's roles.
///
/// At least one shared role is enough.
pub struct AuthorizationGuard;

impl Guard for AuthorizationGuard {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn check(
        &self,
        input: &GuardInput<'_>,
        ctx: RequestContext,
    ) -> Result<RequestContext, GuardError> {
        let metadata = input.metadata;
        if metadata.is_public || metadata.required_roles.is_empty() {
            return Ok(ctx);
        }

        let Some(identity) = ctx.identity() else {
            return Err(GuardError::InternalConsistency { stage: self.name() });
        };

        let allowed = metadata
            .required_roles
            .iter()
            .any(|role| identity.has_role(role.as_str()));

        if allowed {
            Ok(ctx)
        } else {
            Err(GuardError::Forbidden)
        }
    }
}

/// Ordered list of guard stages evaluated for every route.
pub struct GuardChain {
    stages: Vec<Box<dyn Guard>>,
}

impl std::fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("GuardChain").field("stages", &names).finish()
    }
}

impl GuardChain {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            stages: vec![
                Box::new(AuthenticationGuard::new(tokens)),
                Box::new(AuthorizationGuard),
            ],
        }
    }

    /// Run every stage in order, stopping at the first rejection.
    ///
    /// Rejection reasons are logged here and nowhere else; the caller only
    /// ever learns the error kind.
    pub fn evaluate(&self, input: &GuardInput<'_>) -> Result<RequestContext, GuardError> {
        self.stages
            .iter()
            .try_fold(RequestContext::anonymous(), |ctx, stage| {
                stage.check(input, ctx).inspect_err(|err| match err {
                    GuardError::Unauthenticated(reason) => {
                        tracing::warn!(stage = stage.name(), %reason, "request not authenticated");
                    }
                    GuardError::Forbidden => {
                        tracing::info!(
                            stage = stage.name(),
                            required_roles = ?input.metadata.required_roles,
                            "request lacks required role"
                        );
                    }
                    GuardError::InternalConsistency { .. } => {
                        tracing::error!(stage = stage.name(), error = %err, "guard chain misconfigured");
                    }
                })
            })
    }
}
