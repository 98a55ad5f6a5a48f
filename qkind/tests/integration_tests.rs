//! Integration-level tests for the `qkind` facade crate.

use qkind::*;

use std::io::Write;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use tempfile::NamedTempFile;

fn abstract_kind(name: &str) -> QuantityKind {
    QuantityKind::builder(name, Unit::none()).build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Canonical equality
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn lazy_power_over_product_equals_distributed_form() {
    let (m, s, kg) = (&*units::METRE, &*units::SECOND, &*units::KILOGRAM);
    let product = Unit::from_expr(Expr::product(vec![
        m.expr().clone(),
        s.expr().clone(),
        kg.expr().clone(),
        m.expr().clone(),
    ]))
    .unwrap();
    let lazy = ReductionConfig::DEFAULT
        .with_lazy_power_expansion(true)
        .scoped(|| product.try_pow(5).unwrap());
    let eager = &(&(m ^ 10) * &(s ^ 5)) * &(kg ^ 5);
    assert!(matches!(lazy.expr().node(), Node::Power(_, 5)));
    for config in ReductionConfig::all_combinations() {
        config.scoped(|| assert_eq!(lazy, eager));
    }
}

#[test]
fn division_laws() {
    let (l, m, t) = (&*dimensions::LENGTH, &*dimensions::MASS, &*dimensions::TIME);
    let x = &(l * m) / &(t ^ 2);
    assert!((&x / &x).is_identity());

    // partial cancellation removes only the shared factor
    let partial = &(l * m) / &(l * t);
    assert_eq!(partial, m / t);

    // disjoint factors leave the quotient as is
    let disjoint = l / t;
    assert!(disjoint.structurally_eq(&Expr::quotient(l.clone(), t.clone())));
}

#[test]
fn power_laws() {
    let (l, t) = (&*dimensions::LENGTH, &*dimensions::TIME);
    let composite = l / t;
    for base in [l.clone(), composite] {
        assert!(base.pow(0).is_identity());
        assert_eq!(base.pow(1), base);
        assert_eq!(base.pow(-1), &Dimension::none() / &base);
        assert_eq!(base.pow(-4), &Dimension::none() / &base.pow(4));
    }
}

#[test]
fn repeated_powers_past_the_exponent_bound_fail() {
    let squared = dimensions::LENGTH.try_pow(70_000).unwrap();
    let err = squared.try_pow(70_000).unwrap_err();
    assert_eq!(err.atom, "L");
    assert_ne!(squared.pow(2), dimensions::LENGTH.pow(2));
}

#[test]
fn units_with_custom_atoms_compare_canonically() {
    let dollar = Unit::base("$", "dollar", Dimension::base("¤", "currency"));
    let rate = &dollar / &*units::HOUR;
    assert_eq!(&rate * &*units::HOUR, dollar);
    assert_ne!(rate, dollar);
}

// ─────────────────────────────────────────────────────────────────────────────
// Quantity scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn force_times_length_is_energy() {
    let engine = InferenceEngine::new(standard_rules());
    let energy = Quantity::of(100.0, &kinds::FORCE)
        .checked_mul(&Quantity::of(2.0, &kinds::LENGTH), &engine)
        .unwrap();
    assert_eq!(energy.kind(), &*kinds::ENERGY);
    assert_abs_diff_eq!(energy.value(), 200.0);
}

#[test]
fn pressure_area_length_chain() {
    let force = Quantity::of(1000.0, &kinds::PRESSURE) * Quantity::of(2.0, &kinds::AREA);
    assert_eq!(force.kind(), &*kinds::FORCE);
    assert_abs_diff_eq!(force.value(), 2000.0);

    let energy = force * Quantity::of(3.0, &kinds::LENGTH);
    assert_eq!(energy.kind(), &*kinds::ENERGY);
    assert_abs_diff_eq!(energy.value(), 6000.0);
    let joules = energy.convert_to(&units::JOULE).unwrap();
    assert_relative_eq!(joules.value(), 6000.0);
}

#[test]
fn magnetic_flux_density() {
    let density = Quantity::of(7.0, &kinds::MAGNETIC_FLUX) / Quantity::of(2.0, &kinds::AREA);
    assert_eq!(density.kind(), &*kinds::MAGNETIC_FLUX_DENSITY);
    assert_abs_diff_eq!(density.value(), 3.5);
}

#[test]
fn energy_over_mass_fails() {
    let engine = InferenceEngine::new(standard_rules());
    let result = Quantity::of(10.0, &kinds::ENERGY).checked_div(&Quantity::of(2.0, &kinds::MASS), &engine);
    assert!(matches!(result, Err(KindError::NoInference { .. })));
}

#[test]
fn torque_and_energy_stay_apart() {
    let engine = InferenceEngine::new(standard_rules());
    let energy = Quantity::of(10.0, &kinds::ENERGY);
    let torque = Quantity::of(10.0, &kinds::TORQUE);
    assert_eq!(energy.unit().dimension(), torque.unit().dimension());
    assert!(energy.checked_add(&torque).is_err());

    let work = torque
        .checked_mul(&Quantity::of(0.5, &kinds::ANGLE), &engine)
        .unwrap();
    assert_eq!(work.kind(), &*kinds::ENERGY);
    let back = work
        .checked_div(&Quantity::of(0.5, &kinds::ANGLE), &engine)
        .unwrap();
    assert_eq!(back.kind(), &*kinds::TORQUE);
}

#[test]
fn temperature_points_and_deltas() {
    let morning = Quantity::new(Measurement::new(12.0, units::CELSIUS.clone()), &kinds::ABSOLUTE_TEMPERATURE).unwrap();
    let noon = Quantity::new(Measurement::new(77.0, units::FAHRENHEIT.clone()), &kinds::ABSOLUTE_TEMPERATURE).unwrap();

    let rise = &noon - &morning;
    assert_eq!(rise.kind(), &*kinds::TEMPERATURE_DELTA);
    assert_relative_eq!(rise.value(), 13.0, epsilon = 1e-9);

    let evening = &morning + &rise;
    assert_eq!(evening.kind(), &*kinds::ABSOLUTE_TEMPERATURE);
    assert_relative_eq!(evening.value(), 25.0, epsilon = 1e-9);
    assert!(morning.checked_add(&noon).is_err());
    assert!(morning.checked_scale(2.0).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Inference
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn commutative_multiply_and_directional_divide() {
    let engine = InferenceEngine::new(standard_rules());
    assert_eq!(
        engine.resolve(&kinds::LENGTH, Operator::Multiply, &kinds::FORCE),
        Some(kinds::ENERGY.clone())
    );
    assert_eq!(
        engine.infer(&kinds::FORCE, Operator::Divide, &kinds::PRESSURE).unwrap(),
        *kinds::AREA
    );
    assert!(engine
        .infer(&kinds::PRESSURE, Operator::Divide, &kinds::FORCE)
        .is_err());
}

#[test]
fn deeper_search_never_changes_a_direct_result() {
    let engine = InferenceEngine::new(standard_rules());
    for depth in 0..6 {
        let kind = engine
            .resolve_transitive(&kinds::FORCE, Operator::Multiply, &kinds::LENGTH, Some(depth))
            .unwrap();
        assert_eq!(kind, *kinds::ENERGY);
    }
}

#[test]
fn ambiguity_lists_every_result() {
    let (a, z, k, b, w, v) = (
        abstract_kind("A"),
        abstract_kind("Z"),
        abstract_kind("K"),
        abstract_kind("B"),
        abstract_kind("W"),
        abstract_kind("V"),
    );
    let (r1, r2) = (abstract_kind("R1"), abstract_kind("R2"));
    let mut registry = RuleRegistry::new();
    registry
        .register_all([
            InferenceRule::multiply(&a, &k, &b),
            InferenceRule::multiply(&b, &z, &r1),
            InferenceRule::multiply(&w, &z, &v),
            InferenceRule::multiply(&a, &v, &r2),
        ])
        .unwrap();
    let rules = registry.freeze();

    let strict = InferenceEngine::new(rules.clone());
    let err = strict.infer(&a, Operator::Multiply, &z).unwrap_err();
    assert_eq!(err.distinct_results(), vec![r1.clone(), r2]);
    let explanation = strict.explain_failure(&a, Operator::Multiply, &z).unwrap();
    assert!(explanation.starts_with("ambiguous: 2 distinct results"));

    let lenient = InferenceEngine::with_settings(
        rules,
        InferenceSettings {
            strict: false,
            ..InferenceSettings::default()
        },
    );
    assert_eq!(lenient.infer(&a, Operator::Multiply, &z).unwrap(), r1);
}

#[test]
fn failure_explanations() {
    let (p, q, f, l, e) = (
        abstract_kind("P"),
        abstract_kind("Q"),
        abstract_kind("F"),
        abstract_kind("L"),
        abstract_kind("E"),
    );
    let rules = RuleSet::empty()
        .extended([InferenceRule::multiply(&p, &q, &f), InferenceRule::multiply(&f, &l, &e)])
        .unwrap();

    let direct_only = InferenceEngine::with_settings(rules.clone(), InferenceSettings::DIRECT_ONLY);
    assert_eq!(
        direct_only.explain_failure(&p, Operator::Multiply, &l).unwrap(),
        "no direct inference rule for P * L and transitive inference is disabled"
    );

    let engine = InferenceEngine::new(rules);
    assert_eq!(engine.explain_failure(&p, Operator::Multiply, &l), None);
    assert_eq!(
        engine.explain_failure(&l, Operator::Divide, &p).unwrap(),
        "no inference path for L / P within depth 3"
    );
}

#[test]
fn sealed_registry_and_conflicts() {
    let mut registry = standard_registry().unwrap();
    let conflict = registry.register(InferenceRule::multiply(&kinds::FORCE, &kinds::LENGTH, &kinds::TORQUE));
    assert!(matches!(conflict, Err(RegistryError::Conflict { .. })));

    let mut lenient = Settings::from_toml_str("[registry]\nstrict_conflicts = false").unwrap().registry();
    lenient
        .register_all(rules::all())
        .unwrap();
    lenient
        .register(InferenceRule::multiply(&kinds::FORCE, &kinds::LENGTH, &kinds::TORQUE))
        .unwrap();
    let rules = lenient.freeze();
    assert_eq!(
        rules.resolve(&kinds::LENGTH, Operator::Multiply, &kinds::FORCE),
        Some(&*kinds::TORQUE)
    );

    let mut sealed = rules.to_registry();
    sealed.seal();
    assert!(matches!(
        sealed.register(InferenceRule::divide(&kinds::ENERGY, &kinds::MASS, &kinds::VELOCITY)),
        Err(RegistryError::Sealed { .. })
    ));
}

#[test]
fn settings_file_drives_the_engine() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    write!(file, "[inference]\ntransitive = false\n").unwrap();
    let settings = Settings::from_file(file.path()).unwrap();

    let engine = settings.engine(standard_rules());
    assert!(matches!(
        engine.infer(&kinds::ENERGY, Operator::Divide, &kinds::MASS),
        Err(InferenceError::TransitiveDisabled { .. })
    ));
}
