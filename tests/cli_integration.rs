// End-to-end tests driving the cantodetect binary
// WHY: Output format and flag handling are only observable through the real CLI

mod integration;

use integration::{assert_golden_file, run_cli, TestFixture, SAMPLE_LINES};
use serde_json::Value;
use std::fs;

#[test]
fn test_judgement_mode_prints_one_label_per_line() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", SAMPLE_LINES);

    let output = run_cli([
        "--input",
        input.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(
        &String::from_utf8_lossy(&output.stdout),
        "cantonese\nswc\nneutral\nmixed\n",
        "judgement mode",
    );
}

#[test]
fn test_full_mode_with_label_filter_and_output_file() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", SAMPLE_LINES);
    let out = fixture.path("judged.txt");

    let output = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--mode",
        "full",
        "--label",
        "swc",
        "--output",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty(), "Judgements should go to the output file only");
    let written = fs::read_to_string(&out).expect("Failed to read output file");
    assert_eq!(written, "swc\t我們去哪裏？\n");
}

#[test]
fn test_stat_appends_ratios() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", &["我哋去邊度？", "Hello World!"]);

    let output = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--stat",
    ]);

    assert!(output.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(
        &String::from_utf8_lossy(&output.stdout),
        "cantonese\t2/5 (40.00%)\t0/5 (0.00%)\nneutral\tN/A\tN/A\n",
        "stat mode",
    );
}

#[test]
fn test_quotes_flag_refines_label() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", &["他說「係噉嘅」"]);

    let plain = run_cli(["--input", input.to_str().unwrap()]);
    assert!(plain.status.success());

    let split = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--quotes",
    ]);
    assert!(split.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&split.stderr));
    assert_eq!(String::from_utf8_lossy(&split.stdout), "cantonese_quotes_in_swc\n");
}

#[test]
fn test_fullstat_prints_report() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", &["我哋去邊度？"]);

    let output = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--fullstat",
    ]);

    assert!(output.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Splitting quotes: false"), "Report header missing: {stdout}");
    assert!(stdout.contains("Segment: 我哋去邊度？"), "Segment line missing: {stdout}");
    assert!(stdout.ends_with("cantonese\n"));
}

#[test]
fn test_stats_output_json_structure() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", SAMPLE_LINES);
    let stats_file = fixture.path("stats.json");

    let output = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--stats-out",
        stats_file.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&output.stderr));

    let json_content = fs::read_to_string(&stats_file).expect("Failed to read stats file");
    let stats: Value = serde_json::from_str(&json_content).expect("Failed to parse JSON");

    let obj = stats.as_object().expect("Stats should be a JSON object");
    for key in [
        "run_start",
        "input_path",
        "lines_read",
        "lines_written",
        "label_counts",
        "judge_time_ms",
        "total_processing_time_ms",
        "read_error",
    ] {
        assert!(obj.contains_key(key), "Missing {key} field");
    }
    assert_eq!(obj["lines_read"].as_u64(), Some(4));
    assert_eq!(obj["lines_written"].as_u64(), Some(4));
    assert_eq!(obj["label_counts"]["mixed"].as_u64(), Some(1));
    assert!(obj["read_error"].is_null());
}

#[test]
fn test_settings_file_and_flag_validation() {
    let fixture = TestFixture::new();
    let input = fixture.create_input("input.txt", SAMPLE_LINES);
    let settings = fixture.create_file("cantodetect.toml", b"[thresholds]\nswc_presence = 0.05\n");
    let bad_settings = fixture.create_file("bad.toml", b"[thresholds]\nswc_presense = 0.05\n");

    let ok = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--config",
        settings.to_str().unwrap(),
    ]);
    assert!(ok.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&ok.stderr));

    let bad_key = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--config",
        bad_settings.to_str().unwrap(),
    ]);
    assert!(!bad_key.status.success(), "Unknown settings key should be rejected");

    let bad_flag = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--canto-presence",
        "1.5",
    ]);
    assert!(!bad_flag.status.success(), "Out-of-range threshold should be rejected");
}

#[test]
fn test_missing_input_fails() {
    let fixture = TestFixture::new();
    let missing = fixture.path("missing.txt");

    let output = run_cli(["--input", missing.to_str().unwrap()]);
    assert!(!output.status.success(), "Missing input should fail");
}

#[test]
fn test_invalid_utf8_respects_fail_fast() {
    let fixture = TestFixture::new();
    let mut bytes = "我哋去邊度？\n".as_bytes().to_vec();
    bytes.extend_from_slice(&[0xFF, 0xFE, b'\n']);
    let input = fixture.create_file("broken.txt", &bytes);

    let lenient = run_cli(["--input", input.to_str().unwrap()]);
    assert!(lenient.status.success(), "cantodetect failed: {}", String::from_utf8_lossy(&lenient.stderr));
    assert_eq!(String::from_utf8_lossy(&lenient.stdout), "cantonese\n");

    let strict = run_cli([
        "--input",
        input.to_str().unwrap(),
        "--fail-fast",
    ]);
    assert!(!strict.status.success(), "--fail-fast should abort on a read error");
}
