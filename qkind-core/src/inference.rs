//! Transitive kind inference.
//!
//! [`find_path`] answers "what kind does `left op right` produce?" from a [`RuleSet`]:
//!
//! 1. a direct rule always wins and is a depth-1 path;
//! 2. otherwise a breadth-first search chains rules. From a state `(l, op, r)` every rule with the same operator
//!    whose left side is `l` replaces `l` by its result, and every rule whose right side is `r` replaces `r` by its
//!    result (commutative multiplication also matches crosswise). A state that resolves directly becomes a
//!    candidate path and is not expanded further. Results already visited on the branch are skipped, and no path
//!    is longer than `max_depth`;
//! 3. with strict ambiguity checking the candidates must all agree on their result kind. The shortest candidate
//!    wins, first found on ties.
//!
//! [`InferenceEngine`] layers the engine-wide settings on top: a transitive on/off switch, a default depth,
//! dimension validation of transitive candidates, and a cache of raw search results.

use core::fmt::{self, Display, Formatter};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::config::InferenceSettings;
use crate::dimension::Dimension;
use crate::error::InferenceError;
use crate::kind::QuantityKind;
use crate::persistent::PersistentList;
use crate::rules::{InferenceRule, Operator, RuleSet};

// ─────────────────────────────────────────────────────────────────────────────
// Paths
// ─────────────────────────────────────────────────────────────────────────────

/// One rule application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferenceStep {
    pub left: QuantityKind,
    pub operator: Operator,
    pub right: QuantityKind,
    pub result: QuantityKind,
}

impl InferenceStep {
    fn of(rule: &InferenceRule) -> Self {
        Self {
            left: rule.left.clone(),
            operator: rule.operator,
            right: rule.right.clone(),
            result: rule.result.clone(),
        }
    }
}

impl Display for InferenceStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = {}", self.left, self.operator, self.right, self.result)
    }
}

/// Non-empty chain of steps; the last step's result is the inferred kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferencePath {
    steps: Arc<[InferenceStep]>,
    result: QuantityKind,
}

impl InferencePath {
    fn new(steps: Vec<InferenceStep>, result: QuantityKind) -> Self {
        Self {
            steps: steps.into(),
            result,
        }
    }

    pub fn steps(&self) -> &[InferenceStep] {
        &self.steps
    }

    /// Number of rule applications.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn result(&self) -> &QuantityKind {
        &self.result
    }

    pub fn is_direct(&self) -> bool {
        self.depth() == 1
    }
}

impl Display for InferencePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

fn direct_path(left: &QuantityKind, operator: Operator, right: &QuantityKind, result: &QuantityKind) -> InferencePath {
    let step = InferenceStep {
        left: left.clone(),
        operator,
        right: right.clone(),
        result: result.clone(),
    };
    InferencePath::new(vec![step], result.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

struct SearchState {
    left: QuantityKind,
    right: QuantityKind,
    steps: PersistentList<InferenceStep>,
    remaining: usize,
    visited: PersistentList<QuantityKind>,
}

/// Breadth-first search below the root query, which is expanded but never resolved here.
fn breadth_first(
    rules: &RuleSet,
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
    max_depth: usize,
) -> Vec<InferencePath> {
    let root = SearchState {
        left: left.clone(),
        right: right.clone(),
        steps: PersistentList::new(),
        remaining: max_depth,
        visited: PersistentList::new().push(left.clone()).push(right.clone()),
    };
    let mut queue = VecDeque::new();
    expand(rules, operator, &root, &mut queue);

    let mut candidates = Vec::new();
    while let Some(state) = queue.pop_front() {
        if state.remaining < 1 {
            continue;
        }
        if let Some(result) = rules.resolve(&state.left, operator, &state.right) {
            let last = InferenceStep {
                left: state.left.clone(),
                operator,
                right: state.right.clone(),
                result: result.clone(),
            };
            let mut steps = state.steps.to_vec();
            steps.push(last);
            candidates.push(InferencePath::new(steps, result.clone()));
            continue;
        }
        expand(rules, operator, &state, &mut queue);
    }
    candidates
}

fn expand(rules: &RuleSet, operator: Operator, state: &SearchState, queue: &mut VecDeque<SearchState>) {
    for rule in rules.rules().iter().filter(|rule| rule.operator == operator) {
        let mut next: Vec<(&QuantityKind, &QuantityKind)> = Vec::with_capacity(2);
        if rule.left == state.left {
            next.push((&rule.result, &state.right));
        }
        if rule.right == state.right {
            next.push((&state.left, &rule.result));
        }
        if operator == Operator::Multiply && rule.commutative {
            if rule.right == state.left {
                next.push((&rule.result, &state.right));
            }
            if rule.left == state.right {
                next.push((&state.left, &rule.result));
            }
        }
        next.dedup();
        if next.is_empty() || state.visited.contains(&rule.result) {
            continue;
        }

        let steps = state.steps.push(InferenceStep::of(rule));
        let visited = state.visited.push(rule.result.clone());
        for (left, right) in next {
            trace!("Expanding via {}: {} {} {}", rule, left, operator, right);
            queue.push_back(SearchState {
                left: left.clone(),
                right: right.clone(),
                steps: steps.clone(),
                remaining: state.remaining.saturating_sub(1),
                visited: visited.clone(),
            });
        }
    }
}

/// Raw candidates for a root query: the direct path alone if one exists, else every path the search reaches.
fn candidates(
    rules: &RuleSet,
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
    max_depth: usize,
) -> Vec<InferencePath> {
    if max_depth < 1 {
        return Vec::new();
    }
    if let Some(result) = rules.resolve(left, operator, right) {
        return vec![direct_path(left, operator, right, result)];
    }
    if max_depth == 1 {
        return Vec::new();
    }
    breadth_first(rules, left, operator, right, max_depth)
}

fn select(
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
    candidates: &[InferencePath],
    strict: bool,
    max_depth: usize,
) -> Result<InferencePath, InferenceError> {
    let Some(first) = candidates.first() else {
        return Err(InferenceError::NoPath {
            left: left.clone(),
            operator,
            right: right.clone(),
            depth: max_depth,
        });
    };
    if strict && candidates.iter().any(|path| path.result() != first.result()) {
        let error = InferenceError::Ambiguous {
            left: left.clone(),
            operator,
            right: right.clone(),
            paths: candidates.to_vec(),
        };
        debug!("{error}");
        return Err(error);
    }
    Ok(candidates
        .iter()
        .min_by_key(|path| path.depth())
        .unwrap_or(first)
        .clone())
}

/// Finds the kind produced by `left operator right`, searching at most `max_depth` steps.
///
/// Fails with [`InferenceError::NoPath`] when nothing is reachable (always when `max_depth < 1`), and with
/// [`InferenceError::Ambiguous`] when `strict` is set and candidates disagree.
pub fn find_path(
    rules: &RuleSet,
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
    max_depth: usize,
    strict: bool,
) -> Result<InferencePath, InferenceError> {
    let found = candidates(rules, left, operator, right, max_depth);
    select(left, operator, right, &found, strict, max_depth)
}

/// Every path from `left operator right` within `max_depth` steps: the direct path first (if any), then every
/// multi-step path in discovery order.
pub fn enumerate_paths(
    rules: &RuleSet,
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
    max_depth: usize,
) -> Vec<InferencePath> {
    if max_depth < 1 {
        return Vec::new();
    }
    let mut paths: Vec<InferencePath> = rules
        .resolve(left, operator, right)
        .map(|result| direct_path(left, operator, right, result))
        .into_iter()
        .collect();
    if max_depth > 1 {
        paths.extend(breadth_first(rules, left, operator, right, max_depth));
    }
    paths
}

/// Dimension `left operator right` must have.
fn combined_dimension(left: &QuantityKind, operator: Operator, right: &QuantityKind) -> Dimension {
    match operator {
        Operator::Multiply => left.dimension().multiply(right.dimension()),
        Operator::Divide => left.dimension().divide(right.dimension()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

type CacheKey = (QuantityKind, Operator, QuantityKind, usize);

/// Raw search results keyed by `(left, operator, right, depth)`.
#[derive(Default)]
pub struct InferenceCache {
    entries: RwLock<HashMap<CacheKey, Arc<[InferencePath]>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_search(&self, key: CacheKey, search: impl FnOnce() -> Vec<InferencePath>) -> Arc<[InferencePath]> {
        if let Some(found) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Inference cache hit for {} {} {} (depth {})", key.0, key.1, key.2, key.3);
            return Arc::clone(found);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Inference cache miss for {} {} {} (depth {})", key.0, key.1, key.2, key.3);
        let found: Arc<[InferencePath]> = search().into();
        self.entries.write().entry(key).or_insert(found).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

static GLOBAL_ENGINE: OnceCell<InferenceEngine> = OnceCell::new();

/// A rule set plus the settings and cache used to query it.
///
/// ```rust
/// use qkind_core::standard::{kinds, standard_rules};
/// use qkind_core::{InferenceEngine, Operator};
///
/// let engine = InferenceEngine::new(standard_rules());
/// let kind = engine.infer(&kinds::FORCE, Operator::Multiply, &kinds::LENGTH).unwrap();
/// assert_eq!(kind, *kinds::ENERGY);
/// ```
pub struct InferenceEngine {
    rules: RuleSet,
    settings: InferenceSettings,
    cache: InferenceCache,
}

impl InferenceEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_settings(rules, InferenceSettings::default())
    }

    pub fn with_settings(rules: RuleSet, settings: InferenceSettings) -> Self {
        Self {
            rules,
            settings,
            cache: InferenceCache::new(),
        }
    }

    /// Process-wide engine used by the quantity operators; the standard catalog unless another was installed.
    pub fn global() -> &'static InferenceEngine {
        GLOBAL_ENGINE.get_or_init(|| InferenceEngine::new(crate::standard::standard_rules()))
    }

    /// Installs the process-wide engine. Fails, handing `engine` back, once the slot is taken.
    pub fn install(engine: InferenceEngine) -> Result<(), InferenceEngine> {
        GLOBAL_ENGINE.set(engine)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    pub fn cache(&self) -> &InferenceCache {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Direct rule lookup only.
    pub fn resolve(&self, left: &QuantityKind, operator: Operator, right: &QuantityKind) -> Option<QuantityKind> {
        self.rules.resolve(left, operator, right).cloned()
    }

    /// Result kind under the engine settings.
    pub fn infer(
        &self,
        left: &QuantityKind,
        operator: Operator,
        right: &QuantityKind,
    ) -> Result<QuantityKind, InferenceError> {
        self.resolve_transitive(left, operator, right, None)
    }

    /// Result kind, overriding the configured depth with `max_depth` when given.
    pub fn resolve_transitive(
        &self,
        left: &QuantityKind,
        operator: Operator,
        right: &QuantityKind,
        max_depth: Option<usize>,
    ) -> Result<QuantityKind, InferenceError> {
        self.path(left, operator, right, max_depth)
            .map(|path| path.result().clone())
    }

    /// The winning path, or `None` on any failure.
    pub fn try_resolve_with_path(
        &self,
        left: &QuantityKind,
        operator: Operator,
        right: &QuantityKind,
    ) -> Option<InferencePath> {
        self.path(left, operator, right, None).ok()
    }

    /// Winning path under the engine settings.
    ///
    /// A direct rule is returned without searching. With transitive inference disabled, or a depth of `0` or `1`,
    /// only direct rules count.
    pub fn path(
        &self,
        left: &QuantityKind,
        operator: Operator,
        right: &QuantityKind,
        max_depth: Option<usize>,
    ) -> Result<InferencePath, InferenceError> {
        if let Some(result) = self.rules.resolve(left, operator, right) {
            return Ok(direct_path(left, operator, right, result));
        }
        if !self.settings.transitive {
            return Err(InferenceError::TransitiveDisabled {
                left: left.clone(),
                operator,
                right: right.clone(),
            });
        }
        let depth = max_depth.unwrap_or(self.settings.max_depth);
        if depth <= 1 {
            return Err(InferenceError::NoPath {
                left: left.clone(),
                operator,
                right: right.clone(),
                depth,
            });
        }

        let raw: Arc<[InferencePath]> = if self.settings.cache_results {
            self.cache.get_or_search((left.clone(), operator, right.clone(), depth), || {
                candidates(&self.rules, left, operator, right, depth)
            })
        } else {
            candidates(&self.rules, left, operator, right, depth).into()
        };

        let found: Vec<InferencePath> = if self.settings.validate_dimensions {
            let expected = combined_dimension(left, operator, right);
            raw.iter()
                .filter(|path| *path.result().dimension() == expected)
                .cloned()
                .collect()
        } else {
            raw.to_vec()
        };

        let outcome = select(left, operator, right, &found, self.settings.strict, depth);
        match &outcome {
            Ok(path) => debug!("Inferred {} {} {} = {} via {}", left, operator, right, path.result(), path),
            Err(err) => debug!("{err}"),
        }
        outcome
    }

    /// Every path within `max_depth` (or the configured depth, `1` when transitive inference is off), without
    /// validation or ambiguity checks.
    pub fn enumerate_paths(
        &self,
        left: &QuantityKind,
        operator: Operator,
        right: &QuantityKind,
        max_depth: Option<usize>,
    ) -> Vec<InferencePath> {
        let depth = max_depth.unwrap_or(self.settings.effective_depth());
        enumerate_paths(&self.rules, left, operator, right, depth)
    }

    /// `None` when the query resolves, otherwise a human-readable reason.
    pub fn explain_failure(&self, left: &QuantityKind, operator: Operator, right: &QuantityKind) -> Option<String> {
        self.path(left, operator, right, None)
            .err()
            .map(|err| err.to_string())
    }
}
