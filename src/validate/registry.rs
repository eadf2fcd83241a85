//! Ordered collection of checks.

use super::check::Check;
use super::checks::{
    AccountCreate, AccountCreateEmpty, AccountCreateListDelete, AccountListAndRead,
    AccountNotFound, AccountSchemaCheck, AccountUpdateEntitlement, AccountUpdateSingleAttrs,
    EntitlementListRead, EntitlementNotFound, EntitlementSchemaCheck, TestConnectionEmpty,
    TestConnectionSuccess,
};
use log::warn;

/// Checks in the order they run. Ids are unique.
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every standard check, grouped by entity family: connection, account
    /// read, account create, account update, entitlement read.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(TestConnectionEmpty);
        registry.register(TestConnectionSuccess);
        registry.register(AccountListAndRead);
        registry.register(AccountNotFound);
        registry.register(AccountSchemaCheck);
        registry.register(AccountCreateEmpty);
        registry.register(AccountCreate::minimal());
        registry.register(AccountCreate::maximal());
        registry.register(AccountCreateListDelete);
        registry.register(AccountUpdateSingleAttrs);
        registry.register(AccountUpdateEntitlement);
        registry.register(EntitlementNotFound);
        registry.register(EntitlementListRead);
        registry.register(EntitlementSchemaCheck);
        registry
    }

    /// Append a check. Returns `false` and leaves the registry unchanged
    /// when a check with the same id is already registered.
    pub fn register(&mut self, check: impl Check + 'static) -> bool {
        if self.get(check.id()).is_some() {
            warn!("Check {:?} is already registered", check.id());
            return false;
        }
        self.checks.push(Box::new(check));
        true
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.register(check);
        self
    }

    pub fn get(&self, id: &str) -> Option<&dyn Check> {
        self.checks
            .iter()
            .find(|check| check.id() == id)
            .map(|check| check.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|check| check.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.iter().map(|check| check.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
