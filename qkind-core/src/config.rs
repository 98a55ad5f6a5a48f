//! Runtime configuration.
//!
//! Three groups of settings exist:
//!
//! - [`ReductionConfig`]: performance/representation toggles of the canonicalizer. Every combination yields the
//!   same equality and arithmetic results; only the amount of work and the shape of intermediate trees change.
//!   The active value is process-wide, with a thread-local override for scoped experiments and tests.
//! - [`InferenceSettings`]: how an [`InferenceEngine`](crate::InferenceEngine) searches for result kinds.
//! - [`RegistrySettings`]: governance of a [`RuleRegistry`](crate::RuleRegistry).
//!
//! [`Settings`] groups the three and can be read from a TOML file:
//!
//! ```toml
//! [reduction]
//! lazy_power_expansion = true
//! use_factor_vector = true
//!
//! [inference]
//! max_depth = 4
//! strict = false
//!
//! [registry]
//! strict_conflicts = true
//! ```

use core::cell::Cell;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inference::InferenceEngine;
use crate::rules::{RuleRegistry, RuleSet};

// ─────────────────────────────────────────────────────────────────────────────
// Reduction toggles
// ─────────────────────────────────────────────────────────────────────────────

/// Canonicalizer toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    /// Keep `Power(composite, n)` as a wrapper node instead of distributing `n` over the factors.
    pub lazy_power_expansion: bool,
    /// Let equality compare a memoized fixed-size exponent vector when both sides only use basis symbols.
    pub use_factor_vector: bool,
    /// Cancel dividend/divisor factors in one merge instead of one shared symbol at a time.
    pub division_single_pass: bool,
    /// Compare canonical factor sets directly. When off, equality compares rendered canonical trees.
    pub equality_normalization: bool,
    /// Render mixed-sign results as `numerator/denominator` instead of a product with negative powers.
    pub prefer_quotient_display: bool,
}

impl ReductionConfig {
    /// Default toggles.
    pub const DEFAULT: Self = Self {
        lazy_power_expansion: false,
        use_factor_vector: true,
        division_single_pass: true,
        equality_normalization: true,
        prefer_quotient_display: true,
    };

    /// Returns a copy with [`lazy_power_expansion`](Self::lazy_power_expansion) set.
    pub const fn with_lazy_power_expansion(mut self, enabled: bool) -> Self {
        self.lazy_power_expansion = enabled;
        self
    }

    /// Returns a copy with [`use_factor_vector`](Self::use_factor_vector) set.
    pub const fn with_factor_vector(mut self, enabled: bool) -> Self {
        self.use_factor_vector = enabled;
        self
    }

    /// Returns a copy with [`division_single_pass`](Self::division_single_pass) set.
    pub const fn with_division_single_pass(mut self, enabled: bool) -> Self {
        self.division_single_pass = enabled;
        self
    }

    /// Returns a copy with [`equality_normalization`](Self::equality_normalization) set.
    pub const fn with_equality_normalization(mut self, enabled: bool) -> Self {
        self.equality_normalization = enabled;
        self
    }

    /// Returns a copy with [`prefer_quotient_display`](Self::prefer_quotient_display) set.
    pub const fn with_quotient_display(mut self, enabled: bool) -> Self {
        self.prefer_quotient_display = enabled;
        self
    }

    /// Every combination of the five toggles (32 values).
    pub fn all_combinations() -> impl Iterator<Item = Self> {
        (0u8..32).map(|bits| Self {
            lazy_power_expansion: bits & 0b00001 != 0,
            use_factor_vector: bits & 0b00010 != 0,
            division_single_pass: bits & 0b00100 != 0,
            equality_normalization: bits & 0b01000 != 0,
            prefer_quotient_display: bits & 0b10000 != 0,
        })
    }

    /// The configuration in effect on the calling thread.
    ///
    /// A [`scoped`](Self::scoped) override wins over the process-wide value.
    #[inline]
    pub fn current() -> Self {
        OVERRIDE
            .with(|slot| slot.get())
            .unwrap_or_else(|| *GLOBAL.read())
    }

    /// The process-wide configuration, ignoring thread-local overrides.
    pub fn global() -> Self {
        *GLOBAL.read()
    }

    /// Replaces the process-wide configuration.
    pub fn set_global(self) {
        *GLOBAL.write() = self;
        log::debug!("reduction config set globally: {:?}", self);
    }

    /// Runs `f` with this configuration active on the current thread only.
    ///
    /// The previous override (if any) is restored afterwards, also when `f` panics.
    ///
    /// ```rust
    /// use qkind_core::ReductionConfig;
    ///
    /// let lazy = ReductionConfig::DEFAULT.with_lazy_power_expansion(true);
    /// let seen = lazy.scoped(ReductionConfig::current);
    /// assert!(seen.lazy_power_expansion);
    /// ```
    pub fn scoped<R>(self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<ReductionConfig>);

        impl Drop for Restore {
            fn drop(&mut self) {
                let previous = self.0;
                OVERRIDE.with(|slot| slot.set(previous));
            }
        }

        let previous = OVERRIDE.with(|slot| slot.replace(Some(self)));
        let _restore = Restore(previous);
        f()
    }
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static GLOBAL: Lazy<RwLock<ReductionConfig>> = Lazy::new(|| RwLock::new(ReductionConfig::DEFAULT));

thread_local! {
    static OVERRIDE: Cell<Option<ReductionConfig>> = const { Cell::new(None) };
}

// ─────────────────────────────────────────────────────────────────────────────
// Inference and registry settings
// ─────────────────────────────────────────────────────────────────────────────

/// Search settings of an [`InferenceEngine`](crate::InferenceEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Search for multi-hop paths when no direct rule exists.
    pub transitive: bool,
    /// Longest path (in rule applications) the search may return. `0` means direct rules only.
    pub max_depth: usize,
    /// Fail when the candidates of a transitive search disagree on the result kind.
    pub strict: bool,
    /// Memoize root search results per `(left, operator, right, depth)`.
    pub cache_results: bool,
    /// Drop transitive candidates whose result dimension differs from the combined operand dimension.
    pub validate_dimensions: bool,
}

impl InferenceSettings {
    /// Default settings.
    pub const DEFAULT: Self = Self {
        transitive: true,
        max_depth: 3,
        strict: true,
        cache_results: true,
        validate_dimensions: true,
    };

    /// Settings that only ever consult direct rules.
    pub const DIRECT_ONLY: Self = Self {
        transitive: false,
        ..Self::DEFAULT
    };

    /// The depth actually searched: direct-only settings collapse to `1`.
    pub const fn effective_depth(&self) -> usize {
        if !self.transitive || self.max_depth == 0 {
            1
        } else {
            self.max_depth
        }
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Governance settings of a [`RuleRegistry`](crate::RuleRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Reject a rule whose key already maps to a different result instead of overwriting it.
    pub strict_conflicts: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            strict_conflicts: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings file
// ─────────────────────────────────────────────────────────────────────────────

/// All settings, as read from a TOML file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reduction: ReductionConfig,
    pub inference: InferenceSettings,
    pub registry: RegistrySettings,
}

impl Settings {
    /// Parses settings from TOML text. Missing tables and keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Returns
    /// * `Ok(Settings)` if the file was read and parsed
    /// * `Err(ConfigError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!(
            "loaded settings from {}: {:?}",
            path.as_ref().display(),
            settings
        );
        Ok(settings)
    }

    /// An empty rule registry governed by these settings.
    pub fn registry(&self) -> RuleRegistry {
        RuleRegistry::with_settings(self.registry)
    }

    /// An inference engine over `rules` using these settings.
    pub fn engine(&self, rules: RuleSet) -> InferenceEngine {
        InferenceEngine::with_settings(rules, self.inference)
    }

    /// Makes the reduction settings the process-wide default.
    pub fn apply_reduction(&self) {
        self.reduction.set_global();
    }
}
