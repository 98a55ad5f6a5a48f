//! Inference rules and the rule registry.
//!
//! A [`RuleRegistry`] is mutable while rules are registered. [`RuleRegistry::freeze`] seals it and wraps it in a
//! [`RuleSet`], a cheaply clonable read-only value that is handed to an
//! [`InferenceEngine`](crate::inference::InferenceEngine).

use core::fmt::{self, Display, Formatter};
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::RegistrySettings;
use crate::error::RegistryError;
use crate::kind::QuantityKind;

/// Operator of an inference rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Multiply,
    Divide,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Multiply => f.write_str("*"),
            Operator::Divide => f.write_str("/"),
        }
    }
}

/// `left operator right -> result`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferenceRule {
    pub left: QuantityKind,
    pub operator: Operator,
    pub right: QuantityKind,
    pub result: QuantityKind,
    /// For multiplication, also resolves `right * left`.
    pub commutative: bool,
}

impl InferenceRule {
    pub fn new(
        left: &QuantityKind,
        operator: Operator,
        right: &QuantityKind,
        result: &QuantityKind,
        commutative: bool,
    ) -> Self {
        Self {
            left: left.clone(),
            operator,
            right: right.clone(),
            result: result.clone(),
            commutative,
        }
    }

    /// Commutative `left * right -> result`.
    pub fn multiply(left: &QuantityKind, right: &QuantityKind, result: &QuantityKind) -> Self {
        Self::new(left, Operator::Multiply, right, result, true)
    }

    /// `left * right -> result` in this operand order only.
    pub fn multiply_ordered(left: &QuantityKind, right: &QuantityKind, result: &QuantityKind) -> Self {
        Self::new(left, Operator::Multiply, right, result, false)
    }

    /// `left / right -> result`.
    pub fn divide(left: &QuantityKind, right: &QuantityKind, result: &QuantityKind) -> Self {
        Self::new(left, Operator::Divide, right, result, false)
    }

    pub fn key(&self) -> RuleKey {
        RuleKey::new(&self.left, self.operator, &self.right)
    }

    /// The `(right, *, left)` key a commutative multiplication also occupies.
    pub fn mirrored_key(&self) -> Option<RuleKey> {
        (self.commutative && self.operator == Operator::Multiply && self.left != self.right)
            .then(|| RuleKey::new(&self.right, self.operator, &self.left))
    }
}

impl Display for InferenceRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}",
            self.left, self.operator, self.right, self.result
        )
    }
}

/// Lookup key of the direct rule table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub left: QuantityKind,
    pub operator: Operator,
    pub right: QuantityKind,
}

impl RuleKey {
    pub fn new(left: &QuantityKind, operator: Operator, right: &QuantityKind) -> Self {
        Self {
            left: left.clone(),
            operator,
            right: right.clone(),
        }
    }
}

/// Mutable table of inference rules.
///
/// Direct lookups go through a hash table (mirrored keys included); the ordered list of registered rules, before
/// mirroring, drives transitive search.
#[derive(Clone, Debug)]
pub struct RuleRegistry {
    table: HashMap<RuleKey, QuantityKind>,
    rules: Vec<InferenceRule>,
    strict_conflicts: bool,
    sealed: bool,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// An empty registry with strict conflict detection.
    pub fn new() -> Self {
        Self::with_settings(RegistrySettings::default())
    }

    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            table: HashMap::new(),
            rules: Vec::new(),
            strict_conflicts: settings.strict_conflicts,
            sealed: false,
        }
    }

    /// Inserts `rule`, plus its mirrored key for commutative multiplication.
    ///
    /// Registering the exact same rule twice is a no-op. When a key already resolves to a different kind the
    /// registry fails under strict conflict detection and overwrites otherwise. After an overwrite the rule list
    /// keeps exactly the keys that still resolve to their rule's result: a commutative rule that lost one
    /// direction stays listed as an ordered rule for the other.
    pub fn register(&mut self, rule: InferenceRule) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed {
                rule: rule.to_string(),
            });
        }
        if self.rules.contains(&rule) {
            return Ok(());
        }

        let keys = rule_keys(&rule);
        let mut overwritten = false;
        for key in &keys {
            if let Some(existing) = self.table.get(key) {
                if *existing != rule.result {
                    if self.strict_conflicts {
                        return Err(RegistryError::Conflict {
                            rule: rule.to_string(),
                            existing: existing.to_string(),
                        });
                    }
                    warn!(
                        "Overwriting inference rule {} {} {}: {} replaced by {}",
                        key.left, key.operator, key.right, existing, rule.result
                    );
                    overwritten = true;
                }
            }
        }

        for key in &keys {
            self.table.insert(key.clone(), rule.result.clone());
        }
        if overwritten {
            let table = &self.table;
            self.rules = std::mem::take(&mut self.rules)
                .into_iter()
                .filter_map(|existing| surviving(table, existing))
                .collect();
        }
        // an earlier rule whose keys the new one covers with the same result adds nothing
        self.rules.retain(|existing| {
            existing.result != rule.result || !rule_keys(existing).iter().all(|key| keys.contains(key))
        });
        self.rules.push(rule);
        Ok(())
    }

    pub fn register_all<I: IntoIterator<Item = InferenceRule>>(&mut self, rules: I) -> Result<(), RegistryError> {
        rules.into_iter().try_for_each(|rule| self.register(rule))
    }

    /// Disables further registration. Idempotent.
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!("Sealing rule registry with {} rules", self.rules.len());
            self.sealed = true;
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Direct O(1) lookup.
    pub fn resolve(&self, left: &QuantityKind, operator: Operator, right: &QuantityKind) -> Option<&QuantityKind> {
        self.table.get(&RuleKey::new(left, operator, right))
    }

    /// Registered rules in registration order, without mirrored entries.
    pub fn rules(&self) -> &[InferenceRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Seals the registry and turns it into a shareable [`RuleSet`].
    pub fn freeze(mut self) -> RuleSet {
        self.seal();
        RuleSet(Arc::new(self))
    }
}

fn rule_keys(rule: &InferenceRule) -> Vec<RuleKey> {
    std::iter::once(rule.key()).chain(rule.mirrored_key()).collect()
}

/// What is left of `rule` after some of its keys were overwritten: the rule itself, an ordered rule for the one key
/// that still resolves to its result, or nothing.
fn surviving(table: &HashMap<RuleKey, QuantityKind>, rule: InferenceRule) -> Option<InferenceRule> {
    let holds = |key: &RuleKey| table.get(key) == Some(&rule.result);
    let primary = holds(&rule.key());
    let Some(mirror) = rule.mirrored_key() else {
        return primary.then_some(rule);
    };
    match (primary, holds(&mirror)) {
        (true, true) => Some(rule),
        (true, false) => Some(InferenceRule {
            commutative: false,
            ..rule
        }),
        (false, true) => Some(InferenceRule::multiply_ordered(&rule.right, &rule.left, &rule.result)),
        (false, false) => None,
    }
}

/// Immutable, shareable set of inference rules.
#[derive(Clone, Debug)]
pub struct RuleSet(Arc<RuleRegistry>);

impl RuleSet {
    /// A rule set without rules.
    pub fn empty() -> Self {
        RuleRegistry::new().freeze()
    }

    pub fn resolve(&self, left: &QuantityKind, operator: Operator, right: &QuantityKind) -> Option<&QuantityKind> {
        self.0.resolve(left, operator, right)
    }

    pub fn rules(&self) -> &[InferenceRule] {
        self.0.rules()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An unsealed copy to register more rules into.
    pub fn to_registry(&self) -> RuleRegistry {
        let mut registry = (*self.0).clone();
        registry.sealed = false;
        registry
    }

    /// This set plus `rules`, as a new set.
    pub fn extended<I: IntoIterator<Item = InferenceRule>>(&self, rules: I) -> Result<RuleSet, RegistryError> {
        let mut registry = self.to_registry();
        registry.register_all(rules)?;
        Ok(registry.freeze())
    }
}
