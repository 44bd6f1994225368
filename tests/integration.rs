//! End-to-end tests: encode → mine → rules → artifact → recommend.

use cesta::artifact::ModelArtifact;
use cesta::error::CestaError;
use cesta::mining::FpGrowth;
use cesta::recommend::RecommendationEngine;
use cesta::rules::RuleGenerator;

fn worked_example() -> Vec<Vec<&'static str>> {
    vec![
        vec!["bread", "milk"],
        vec!["bread", "diaper", "beer"],
        vec!["milk", "diaper", "beer", "eggs"],
        vec!["bread", "milk", "diaper", "beer"],
        vec!["bread", "milk", "diaper", "eggs"],
    ]
}

#[test]
fn full_pipeline_on_worked_example() {
    let transactions = worked_example();

    let mut miner = FpGrowth::new().with_min_support(0.6);
    miner.fit(&transactions).unwrap();
    assert_eq!(miner.n_transactions(), 5);

    let itemsets = miner.frequent_itemsets();
    let pair = itemsets
        .iter()
        .find(|fi| fi.items == ["diaper", "milk"])
        .expect("frequent pair survives");
    assert_eq!(pair.count, 3);
    assert!((pair.support - 0.6).abs() < 1e-12);

    let rules = RuleGenerator::new()
        .with_min_confidence(0.4)
        .with_min_lift(0.0)
        .generate(itemsets, miner.n_transactions())
        .unwrap();
    let milk_diaper = rules
        .iter()
        .find(|r| r.antecedent == ["milk"] && r.consequent == ["diaper"])
        .expect("rule survives 0.4 confidence");
    assert!((milk_diaper.confidence - 0.75).abs() < 1e-12);
    assert!((milk_diaper.lift - 0.9375).abs() < 1e-12);

    let engine = RecommendationEngine::from_rules(rules);
    let recs = engine.recommend(&["milk"], 3).unwrap();
    assert!(recs.iter().any(|r| r.item == "diaper"));
    assert!(recs.iter().all(|r| r.item != "milk"));
}

#[test]
fn artifact_round_trip_preserves_recommendations() {
    let transactions = worked_example();
    let mut miner = FpGrowth::new().with_min_support(0.6);
    miner.fit(&transactions).unwrap();
    let rules = RuleGenerator::new()
        .with_min_confidence(0.4)
        .with_min_lift(0.0)
        .generate(miner.frequent_itemsets(), miner.n_transactions())
        .unwrap();

    let artifact = ModelArtifact {
        min_support: 0.6,
        min_confidence: 0.4,
        min_lift: 0.0,
        n_transactions: miner.n_transactions(),
        itemsets: miner.frequent_itemsets().to_vec(),
        rules: rules.clone(),
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basket_model.cst");
    artifact.save(&path).unwrap();

    let restored = ModelArtifact::load(&path).unwrap();
    assert_eq!(restored, artifact);

    let direct = RecommendationEngine::from_rules(rules);
    let loaded = RecommendationEngine::load(&path).unwrap();
    assert_eq!(loaded.n_rules(), direct.n_rules());
    assert_eq!(
        loaded.recommend(&["milk", "beer"], 5).unwrap(),
        direct.recommend(&["milk", "beer"], 5).unwrap()
    );
}

#[test]
fn corrupt_artifact_fails_loud() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.cst");

    let mut miner = FpGrowth::new().with_min_support(0.6);
    miner.fit(&worked_example()).unwrap();
    let artifact = ModelArtifact {
        min_support: 0.6,
        min_confidence: 0.4,
        min_lift: 0.0,
        n_transactions: miner.n_transactions(),
        itemsets: miner.frequent_itemsets().to_vec(),
        rules: Vec::new(),
    };
    artifact.save(&path).unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x55;
    std::fs::write(&path, &bytes).unwrap();

    let err = RecommendationEngine::load(&path).unwrap_err();
    assert!(matches!(err, CestaError::ChecksumMismatch { .. }));
}

#[test]
fn absent_artifact_is_distinct_from_no_recommendations() {
    let dir = tempfile::tempdir().unwrap();
    // missing file: a hard error, not an empty engine
    let err = RecommendationEngine::load(dir.path().join("nope.cst")).unwrap_err();
    assert!(matches!(err, CestaError::Io(_)));

    // whereas an engine with no applicable rules answers Ok(empty)
    let engine = RecommendationEngine::from_rules(Vec::new());
    assert!(engine.recommend(&["milk"], 5).unwrap().is_empty());
}

#[test]
fn threshold_too_high_empties_everything() {
    let transactions = worked_example();
    let mut miner = FpGrowth::new().with_min_support(0.99);
    miner.fit(&transactions).unwrap();
    assert!(miner.frequent_itemsets().is_empty());

    let rules = RuleGenerator::new()
        .generate(miner.frequent_itemsets(), miner.n_transactions())
        .unwrap();
    assert!(rules.is_empty());

    let engine = RecommendationEngine::from_rules(rules);
    assert!(engine.recommend(&["bread", "milk"], 5).unwrap().is_empty());
}

#[test]
fn independent_items_have_lift_near_one() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // two items dropped into baskets by independent coin flips
    let mut rng = StdRng::seed_from_u64(42);
    let mut transactions: Vec<Vec<&str>> = Vec::new();
    for _ in 0..4000 {
        let mut basket = vec!["anchor"];
        if rng.gen_bool(0.5) {
            basket.push("tea");
        }
        if rng.gen_bool(0.5) {
            basket.push("soap");
        }
        transactions.push(basket);
    }

    let mut miner = FpGrowth::new().with_min_support(0.05);
    miner.fit(&transactions).unwrap();
    let rules = RuleGenerator::new()
        .with_min_confidence(0.0)
        .with_min_lift(0.0)
        .generate(miner.frequent_itemsets(), miner.n_transactions())
        .unwrap();

    let rule = rules
        .iter()
        .find(|r| r.antecedent == ["tea"] && r.consequent == ["soap"])
        .expect("both singles and the pair are frequent");
    assert!(
        (rule.lift - 1.0).abs() < 0.1,
        "independent items should have lift near 1, got {}",
        rule.lift
    );
}

#[test]
fn mining_is_deterministic_end_to_end() {
    let transactions = worked_example();

    let run = || {
        let mut miner = FpGrowth::new().with_min_support(0.2);
        miner.fit(&transactions).unwrap();
        let rules = RuleGenerator::new()
            .with_min_confidence(0.1)
            .with_min_lift(0.0)
            .generate(miner.frequent_itemsets(), miner.n_transactions())
            .unwrap();
        (miner.frequent_itemsets().to_vec(), rules)
    };

    let (itemsets_a, rules_a) = run();
    let (itemsets_b, rules_b) = run();
    assert_eq!(itemsets_a, itemsets_b);
    assert_eq!(rules_a, rules_b);
}
