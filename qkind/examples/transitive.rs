//! Multi-step kind inference: paths, ambiguity and failure explanations.

use qkind::{kinds, standard_rules, InferenceEngine, InferenceRule, InferenceSettings, Operator, QuantityKind, Unit};

fn main() {
    let engine = InferenceEngine::new(standard_rules());

    for path in engine.enumerate_paths(&kinds::PRESSURE, Operator::Multiply, &kinds::VOLUME, None) {
        println!("Pressure * Volume: {path} (depth {})", path.depth());
    }

    if let Some(reason) = engine.explain_failure(&kinds::ENERGY, Operator::Divide, &kinds::MASS) {
        println!("Energy / Mass: {reason}");
    }

    // two chains from (A, Z) that disagree
    let kind = |name: &str| QuantityKind::builder(name, Unit::none()).build();
    let (a, z, k, b, w, v) = (kind("A"), kind("Z"), kind("K"), kind("B"), kind("W"), kind("V"));
    let (r1, r2) = (kind("R1"), kind("R2"));
    let rules = qkind::RuleSet::empty()
        .extended([
            InferenceRule::multiply(&a, &k, &b),
            InferenceRule::multiply(&b, &z, &r1),
            InferenceRule::multiply(&w, &z, &v),
            InferenceRule::multiply(&a, &v, &r2),
        ])
        .unwrap();

    let strict = InferenceEngine::new(rules.clone());
    match strict.infer(&a, Operator::Multiply, &z) {
        Ok(result) => println!("A * Z = {result}"),
        Err(err) => {
            assert_eq!(err.distinct_results(), vec![r1.clone(), r2]);
            println!("strict: {err}");
        }
    }

    let lenient = InferenceEngine::with_settings(
        rules,
        InferenceSettings {
            strict: false,
            ..InferenceSettings::default()
        },
    );
    if let Some(path) = lenient.try_resolve_with_path(&a, Operator::Multiply, &z) {
        println!("lenient: {path}");
    }
    assert_eq!(lenient.infer(&a, Operator::Multiply, &z).unwrap(), r1);
}
