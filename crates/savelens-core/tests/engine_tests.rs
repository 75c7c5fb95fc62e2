//! End-to-end analysis and rewrite tests against real files.

use std::fs;
use std::path::Path;

use savelens_core::{
    Analyzer, DataType, FsAccess, Location, MemoryAccess, Rewriter, StructureKind, analyze,
    rewrite, rewrite_bytes, validate,
};
use tempfile::tempdir;

const BIG_ENDIAN_SAVE: [u8; 16] = [
    0x00, 0x00, 0x13, 0x88, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x09, 0xC4, 0xFF, 0xFF, 0xFF,
    0xFF,
];

/// Deterministic generator for fuzz inputs
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next() as u8).collect()
    }
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("player.json");
    fs::write(&path, r#"{"player":{"gold":12500}}"#).unwrap();

    let analysis = analyze(&path);
    assert_eq!(analysis.kind(), StructureKind::Json);
    let gold = analysis.find("gold", None).unwrap();
    assert_eq!(gold.raw_value, "12500");

    assert!(rewrite(&path, &gold.with_edit("99999"), "99999"));

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(value["player"]["gold"], 99999);

    let again = analyze(&path);
    assert!(again.find("gold", None).is_some());
    assert!(again.candidates.iter().all(|c| !c.raw_value.contains("12500")));
}

#[test]
fn test_key_value_rewrite_keeps_other_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.ini");
    fs::write(&path, "player.gold=5000\nplayer.level=10\n").unwrap();

    let analysis = analyze(&path);
    assert_eq!(analysis.kind(), StructureKind::KeyValue);
    let gold = analysis.find("player.gold", None).unwrap();

    assert!(rewrite(&path, gold, "50000"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "player.gold=50000\nplayer.level=10\n"
    );
}

#[test]
fn test_rejected_value_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.ini");
    fs::write(&path, "gold=5000\n").unwrap();

    let gold = analyze(&path).find("gold", None).unwrap().clone();
    assert!(!rewrite(&path, &gold, "12.5"));
    assert!(!rewrite(&path, &gold, "lots"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "gold=5000\n");
}

#[test]
fn test_xml_preferences_rewrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.xml");
    fs::write(
        &path,
        "<?xml version='1.0' encoding='utf-8' standalone='yes' ?>\n<map>\n    <int name=\"gold\" value=\"500\" />\n</map>\n",
    )
    .unwrap();

    let analysis = analyze(&path);
    assert_eq!(analysis.kind(), StructureKind::Xml);
    let gold = analysis.find("gold", None).unwrap();
    assert!(rewrite(&path, gold, "750"));
    assert!(
        fs::read_to_string(&path)
            .unwrap()
            .contains("<int name=\"gold\" value=\"750\" />")
    );
}

#[test]
fn test_pattern_candidate_rewrites_value_not_key() {
    let bytes = b"a1=1\na2=2\na3=3\n";
    let analysis = Analyzer::default().analyze_bytes(bytes, "levels");
    let pattern = analysis
        .candidates
        .iter()
        .find(|c| c.key.starts_with("pattern_") && matches!(c.location, Location::Line { .. }))
        .unwrap();

    let out = String::from_utf8(rewrite_bytes(bytes, pattern, "5").unwrap()).unwrap();
    let pairs: Vec<(&str, &str)> = out.lines().filter_map(|l| l.split_once('=')).collect();
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["a1", "a2", "a3"]);
    assert_eq!(pairs.iter().filter(|(_, v)| *v == "5").count(), 1);
}

#[test]
fn test_dotted_json_key_rewrites_its_own_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(&path, r#"{"a.b":1,"a":{"b":2}}"#).unwrap();

    let analysis = analyze(&path);
    let dotted = analysis.find("a.b", None).unwrap();
    assert_eq!(dotted.location, Location::json(r#"["a.b"]"#));
    assert!(rewrite(&path, dotted, "9"));

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(value["a.b"], 9);
    assert_eq!(value["a"]["b"], 2);
}

#[test]
fn test_validate_rules() {
    assert!(!validate("12.5", DataType::Integer));
    assert!(validate("12", DataType::Float));
    assert!(validate("true", DataType::Boolean));
    assert!(!validate("maybe", DataType::Boolean));
    assert!(validate("", DataType::String));
}

#[test]
fn test_big_endian_binary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("slot1.dat");
    fs::write(&path, BIG_ENDIAN_SAVE).unwrap();

    let analysis = analyze(&path);
    assert_eq!(analysis.kind(), StructureKind::Binary);
    assert_eq!(analysis.encoding, None);
    let values: Vec<&str> = analysis
        .candidates
        .iter()
        .map(|c| c.raw_value.as_str())
        .collect();
    for expected in ["5000", "10", "2500"] {
        assert!(values.contains(&expected), "missing {}", expected);
    }
    assert!(!values.contains(&"-1"));

    let first = analysis.find("int32_be_0", None).unwrap();
    assert!(rewrite(&path, first, "6000"));

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &6000u32.to_be_bytes());
    assert_eq!(&bytes[4..], &BIG_ENDIAN_SAVE[4..]);
}

#[test]
fn test_invalid_json_is_plain_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ invalid json content }").unwrap();

    let analysis = analyze(&path);
    assert_eq!(analysis.kind(), StructureKind::PlainText);
}

#[test]
fn test_empty_and_missing_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.sav");
    fs::write(&path, b"").unwrap();

    let analysis = analyze(&path);
    assert!(analysis.candidates.is_empty());
    assert_eq!(analysis.kind(), StructureKind::Binary);

    let missing = analyze(dir.path().join("missing.sav"));
    assert!(missing.candidates.is_empty());
}

#[test]
fn test_analysis_is_repeatable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(
        &path,
        r#"{"player":{"gold":1200,"gems":35,"level":7,"xp":[100,250,600,1400]},"settings":{"volume":0.8}}"#,
    )
    .unwrap();

    let analyzer = Analyzer::default();
    let first = analyzer.analyze(&FsAccess, &path);
    let second = analyzer.analyze(&FsAccess, &path);
    assert!(!first.candidates.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_read_only_target() {
    let access = MemoryAccess::new().with_file("save.ini", b"gold=5\n".to_vec());
    let path = Path::new("save.ini");
    let analysis = Analyzer::default().analyze(&access, path);
    let gold = analysis.find("gold", None).unwrap();

    access.set_read_only("save.ini");
    assert!(!Rewriter::new(&access).rewrite(path, gold, "6"));
    assert_eq!(access.get(path).unwrap(), b"gold=5\n");
}

#[test]
fn test_confidence_bounds_under_noise() {
    let mut rng = Lcg(0x5eed);
    let analyzer = Analyzer::default();
    let words = ["gold", "hp", "level", "name", "x", "volume", "gems", "id"];

    for round in 0..40 {
        let len = 64 + (rng.next() % 192) as usize;
        let bytes = rng.bytes(len);
        let binary = analyzer.analyze_bytes(&bytes, "fuzz");

        let mut text = String::new();
        for _ in 0..(rng.next() % 12) {
            let word = words[(rng.next() % words.len() as u64) as usize];
            let value = rng.next() % 100_000;
            let separator = if rng.next() % 2 == 0 { "=" } else { ": " };
            text.push_str(&format!("{}{}{}\n", word, separator, value));
        }
        let keyed = analyzer.analyze_bytes(text.as_bytes(), "fuzz");

        for analysis in [&binary, &keyed] {
            assert!(analysis.candidates.len() <= analyzer.config().max_candidates);
            for candidate in &analysis.candidates {
                assert!(
                    (0.0..=1.0).contains(&candidate.confidence),
                    "round {}: {} has confidence {}",
                    round,
                    candidate.key,
                    candidate.confidence
                );
            }
            assert!(
                analysis
                    .candidates
                    .windows(2)
                    .all(|pair| pair[0].confidence >= pair[1].confidence)
            );
        }
    }
}
