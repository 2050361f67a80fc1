use std::collections::BTreeMap;
use std::fmt;

use super::builtin::{
    BUSINESS_CLASS_REQUIRES_LONG_HAUL, BusinessClassRequiresLongHaul, MAX_DISCOUNT_CAP,
    MaxDiscountCap, NO_LUXURY_HOTEL_FOR_JUNIORS, NOT_CHEAPEST_DIRECT, NoLuxuryHotelForJuniors,
    NotCheapestDirect, RULE_MARKED_OUT_OF_POLICY, RuleMarkedOutOfPolicy,
};
use super::{Policy, PolicyConfig, PolicyError};

/// Named policies, kept in name order. Read-only once handed to a
/// [`PolicyChecker`](super::PolicyChecker).
#[derive(Default)]
pub struct PolicyRegistry {
    policies: BTreeMap<String, Box<dyn Policy>>,
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("policies", &self.policies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PolicyRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in travel policies, configured by `config`.
    #[must_use]
    pub fn with_builtins(config: &PolicyConfig) -> Self {
        let mut policies: BTreeMap<String, Box<dyn Policy>> = BTreeMap::new();
        policies.insert(
            NOT_CHEAPEST_DIRECT.to_owned(),
            Box::new(NotCheapestDirect::new(config)),
        );
        policies.insert(
            NO_LUXURY_HOTEL_FOR_JUNIORS.to_owned(),
            Box::new(NoLuxuryHotelForJuniors::new(config)),
        );
        policies.insert(
            BUSINESS_CLASS_REQUIRES_LONG_HAUL.to_owned(),
            Box::new(BusinessClassRequiresLongHaul::new(config)),
        );
        policies.insert(
            MAX_DISCOUNT_CAP.to_owned(),
            Box::new(MaxDiscountCap::new(config)),
        );
        policies.insert(
            RULE_MARKED_OUT_OF_POLICY.to_owned(),
            Box::new(RuleMarkedOutOfPolicy),
        );
        Self { policies }
    }

    /// Add a policy under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::DuplicatePolicy`] if the name is taken.
    pub fn register(
        &mut self,
        name: &str,
        policy: impl Policy + 'static,
    ) -> Result<(), PolicyError> {
        if self.policies.contains_key(name) {
            return Err(PolicyError::DuplicatePolicy {
                name: name.to_owned(),
            });
        }
        self.policies.insert(name.to_owned(), Box::new(policy));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Policy> {
        self.policies.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &dyn Policy)> {
        self.policies
            .iter()
            .map(|(name, policy)| (name.as_str(), policy.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
