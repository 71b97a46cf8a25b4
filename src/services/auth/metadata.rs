//! Declarative per-route guard configuration.
//!
//! Routes are annotated at registration time with `Public` and/or
//! `Roles(..)`, either on the handler itself or as a default for the whole
//! controller. The reader resolves the effective [`RouteMetadata`] for one
//! handler: handler-level wins, controller-level is the fallback, and a route
//! nobody marked public is secured.

use std::collections::{BTreeSet, HashMap};

use crate::services::auth::roles::Role;

/// Identifies a handler as `<controller>.<method>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    pub controller: &'static str,
    pub method: &'static str,
}

impl HandlerRef {
    pub const fn new(controller: &'static str, method: &'static str) -> Self {
        Self { controller, method }
    }
}

/// Annotations as declared at one level. `None` means "not declared here".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    public: Option<bool>,
    roles: Option<BTreeSet<Role>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Public` marker.
    pub fn public(mut self) -> Self {
        self.public = Some(true);
        self
    }

    /// `Roles(role, ...)`.
    pub fn roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.roles = Some(roles.into_iter().collect());
        self
    }
}

/// Effective guard configuration for one handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMetadata {
    pub is_public: bool,
    pub required_roles: BTreeSet<Role>,
}

#[cfg(test)]
impl RouteMetadata {
    pub fn public() -> Self {
        Self {
            is_public: true,
            required_roles: BTreeSet::new(),
        }
    }

    pub fn secured<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self {
            is_public: false,
            required_roles: roles.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteMetadataReader {
    controllers: HashMap<&'static str, Annotations>,
    handlers: HashMap<HandlerRef, Annotations>,
}

impl RouteMetadataReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(mut self, controller: &'static str, annotations: Annotations) -> Self {
        self.controllers.insert(controller, annotations);
        self
    }

    pub fn handler(mut self, handler: HandlerRef, annotations: Annotations) -> Self {
        self.handlers.insert(handler, annotations);
        self
    }

    pub fn resolve(&self, handler: HandlerRef) -> RouteMetadata {
        let on_handler = self.handlers.get(&handler);
        let on_controller = self.controllers.get(handler.controller);

        let is_public = on_handler
            .and_then(|a| a.public)
            .or_else(|| on_controller.and_then(|a| a.public))
            .unwrap_or(false);

        let required_roles = on_handler
            .and_then(|a| a.roles.clone())
            .or_else(|| on_controller.and_then(|a| a.roles.clone()))
            .unwrap_or_default();

        RouteMetadata {
            is_public,
            required_roles,
        }
    }
}
