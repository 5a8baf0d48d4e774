use std::collections::BTreeSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use zbib_classify::{DimensionRegistry, PatternClassifier};
use zbib_common::{CombinationSet, DimensionGroup, Record, Source};
use zbib_gap::{find_gaps, GapDetector, GapReport};
use zbib_test_utils::{sample_combinations, sample_definitions, RecordBuilder};

fn setup() -> (PatternClassifier, GapDetector) {
    let registry = Arc::new(DimensionRegistry::from_definitions(&sample_definitions()).unwrap());
    let detector = GapDetector::new(&registry, &sample_combinations()).unwrap();
    (PatternClassifier::new(registry), detector)
}

fn snapshot() -> Vec<Record> {
    let mut records = Vec::new();
    for i in 0..4 {
        records.push(
            RecordBuilder::new(format!("pm-hit-{i}"))
                .title("Orbitofrontal cortex stimulation")
                .abstract_text("Effects on negative symptoms in schizophrenia.")
                .build(),
        );
    }
    for i in 0..6 {
        records.push(
            RecordBuilder::new(format!("pm-miss-{i}"))
                .title("Motor cortex excitability in healthy adults")
                .build(),
        );
    }
    for i in 0..3 {
        records.push(
            RecordBuilder::new(format!("nih-{i}"))
                .title("Neural mechanisms of auditory hallucinations")
                .source(Source::Nih)
                .build(),
        );
    }
    records
}

#[test]
fn test_end_to_end_ofc_negative() {
    let (classifier, detector) = setup();
    let records = snapshot();
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);

    let matrix = detector.build_matrix(&records, &table);
    assert_eq!(matrix.get(Source::PubMed, "OFC+Negative"), 4);
    assert_eq!(matrix.get(Source::Nih, "OFC+Negative"), 0);
    assert_eq!(matrix.total(Source::PubMed), 10);
    assert_eq!(matrix.total(Source::Nih), 3);

    let gaps = find_gaps(&matrix, 0);
    assert!(!gaps[&Source::PubMed].contains("OFC+Negative"));
    assert!(gaps[&Source::PubMed].contains("DLPFC+Cognitive"));
    assert_eq!(
        gaps[&Source::Nih],
        BTreeSet::from(["DLPFC+Cognitive".to_string(), "OFC+Negative".to_string()])
    );
}

#[test]
fn test_declared_source_without_records_is_all_gaps() {
    let (classifier, detector) = setup();
    let detector = detector.with_sources([Source::Nsfc]);
    let records = snapshot();
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);

    let report = detector.report(&records, &table, 0);
    assert_eq!(report.matrix.total(Source::Nsfc), 0);
    assert_eq!(report.gaps[&Source::Nsfc].len(), detector.combinations().len());
}

#[test]
fn test_counts_monotone_when_records_added() {
    let (classifier, detector) = setup();
    let mut records = snapshot();
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);
    let before = detector.build_matrix(&records, &table);

    records.push(
        RecordBuilder::new("pm-extra")
            .title("OFC theta burst for anhedonia and working memory in the DLPFC")
            .build(),
    );
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);
    let after = detector.build_matrix(&records, &table);

    for source in before.sources() {
        for combo in detector.combinations() {
            assert!(after.get(source, &combo.name) >= before.get(source, &combo.name));
        }
    }
    assert_eq!(after.get(Source::PubMed, "OFC+Negative"), 5);
    assert_eq!(after.get(Source::PubMed, "DLPFC+Cognitive"), 1);
}

#[test]
fn test_adding_a_dimension_never_raises_the_count() {
    let registry = Arc::new(DimensionRegistry::from_definitions(&sample_definitions()).unwrap());
    let combos = CombinationSet::from([
        ("OFC+Negative".to_string(), vec!["OFC".to_string(), "Negative".to_string()]),
        (
            "OFC+Negative+TMS".to_string(),
            vec!["OFC".to_string(), "Negative".to_string(), "TMS".to_string()],
        ),
    ]);
    let detector = GapDetector::new(&registry, &combos).unwrap();
    let classifier = PatternClassifier::new(registry);

    let mut records = snapshot();
    for (id, source) in [("pm-tms-0", Source::PubMed), ("pm-tms-1", Source::PubMed), ("nih-tms", Source::Nih)] {
        records.push(
            RecordBuilder::new(id)
                .title("rTMS of the orbitofrontal cortex for anhedonia")
                .source(source)
                .build(),
        );
    }
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);
    let matrix = detector.build_matrix(&records, &table);

    for source in matrix.sources() {
        assert!(matrix.get(source, "OFC+Negative+TMS") <= matrix.get(source, "OFC+Negative"));
    }
    assert_eq!(matrix.get(Source::PubMed, "OFC+Negative"), 6);
    assert_eq!(matrix.get(Source::PubMed, "OFC+Negative+TMS"), 2);
    assert_eq!(matrix.get(Source::Nih, "OFC+Negative+TMS"), 1);
}

#[test]
fn test_shared_id_across_sources_counts_each_record() {
    let (classifier, detector) = setup();
    let records = vec![
        RecordBuilder::new("1").title("Orbitofrontal TMS for anhedonia").source(Source::PubMed).build(),
        RecordBuilder::new("1").title("Motor cortex plasticity").source(Source::Nih).build(),
    ];
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);

    let matrix = detector.build_matrix(&records, &table);
    assert_eq!(matrix.get(Source::PubMed, "OFC+Negative"), 1);
    assert_eq!(matrix.get(Source::Nih, "OFC+Negative"), 0);

    let gaps = find_gaps(&matrix, 0);
    assert!(!gaps[&Source::PubMed].contains("OFC+Negative"));
    assert!(gaps[&Source::Nih].contains("OFC+Negative"));
}

#[test]
fn test_report_json_round_trip() {
    let (classifier, detector) = setup();
    let records = snapshot();
    let table = classifier.classify_all(&records, &DimensionGroup::ALL);
    let report = detector.report(&records, &table, 0);

    let json = serde_json::to_string(&report).unwrap();
    let back: GapReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, back);
}
