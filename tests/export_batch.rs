use std::path::Path;

use patternart::{DensityTable, Provider, Theme, export_batch, load_templates};

fn densities(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn empty_template_set_exports_the_fallbacks() {
    let tmp = tempfile::tempdir().unwrap();
    let report = export_batch(
        &[],
        &Theme::neon(),
        &DensityTable::default_tiers(),
        &densities(&["mdpi", "xhdpi"]),
        tmp.path(),
        Provider::LocalDeterministic,
    )
    .unwrap();

    assert!(report.failed.is_empty());
    assert_eq!(report.written.len(), 6); // 3 fallbacks x 2 densities
    for name in ["bull_flag", "descending_triangle", "head_shoulders"] {
        assert!(tmp.path().join(format!("drawable/pattern_{name}.png")).is_file());
        assert!(
            tmp.path()
                .join(format!("drawable-xhdpi/pattern_{name}.png"))
                .is_file()
        );
    }
}

#[test]
fn artifacts_are_native_resolution_pngs() {
    let tmp = tempfile::tempdir().unwrap();
    export_batch(
        &[],
        &Theme::neon(),
        &DensityTable::default_tiers(),
        &densities(&["mdpi", "xxxhdpi"]),
        tmp.path(),
        Provider::LocalDeterministic,
    )
    .unwrap();

    let small = image::open(tmp.path().join("drawable/pattern_bull_flag.png")).unwrap();
    assert_eq!((small.width(), small.height()), (320, 240));
    let big = image::open(tmp.path().join("drawable-xxxhdpi/pattern_bull_flag.png")).unwrap();
    assert_eq!((big.width(), big.height()), (1280, 960));
}

#[test]
fn unknown_density_fails_before_anything_is_written() {
    let tmp = tempfile::tempdir().unwrap();
    let err = export_batch(
        &[],
        &Theme::neon(),
        &DensityTable::default_tiers(),
        &densities(&["mdpi", "retina"]),
        tmp.path(),
        Provider::LocalDeterministic,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown density"));
    assert!(!tmp.path().join("drawable").exists());
}

#[test]
fn report_is_sorted_by_pattern_then_density() {
    let tmp = tempfile::tempdir().unwrap();
    let report = export_batch(
        &[],
        &Theme::mono(),
        &DensityTable::default_tiers(),
        &densities(&["xhdpi", "hdpi"]),
        tmp.path(),
        Provider::LocalDeterministic,
    )
    .unwrap();
    let keys: Vec<(String, String)> = report
        .written
        .iter()
        .map(|a| (a.pattern.clone(), a.density.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn discovered_templates_drive_the_batch_and_bad_files_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let tpl_dir = tmp.path().join("templates");
    std::fs::create_dir_all(&tpl_dir).unwrap();
    std::fs::write(
        tpl_dir.join("cup_handle.json"),
        r#"{"render":{"series_style":"line","series_points":60,"confidence":0.8}}"#,
    )
    .unwrap();
    std::fs::write(tpl_dir.join("broken.json"), "{ not json").unwrap();

    let templates = load_templates(&tpl_dir).unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].name, "cup_handle");
    assert_eq!(templates[0].label, "Cup Handle");

    let out = tmp.path().join("res");
    let report = export_batch(
        &templates,
        &Theme::neon(),
        &DensityTable::default_tiers(),
        &densities(&["mdpi"]),
        &out,
        Provider::LocalDeterministic,
    )
    .unwrap();
    assert_eq!(report.written.len(), 1);
    assert!(out.join("drawable/pattern_cup_handle.png").is_file());
}

#[test]
fn write_failure_is_confined_to_its_own_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    // a regular file where the hdpi directory should go makes every
    // hdpi write fail while mdpi stays healthy
    std::fs::write(tmp.path().join("drawable-hdpi"), b"in the way").unwrap();

    let report = export_batch(
        &[],
        &Theme::neon(),
        &DensityTable::default_tiers(),
        &densities(&["mdpi", "hdpi"]),
        tmp.path(),
        Provider::LocalDeterministic,
    )
    .unwrap();

    assert_eq!(report.written.len(), 3);
    assert_eq!(report.failed.len(), 3);
    for a in &report.written {
        assert_eq!(a.density, "mdpi");
        assert!(a.path.is_file());
    }
    for f in &report.failed {
        assert_eq!(f.density, "hdpi");
        assert!(!f.error.is_empty());
    }
}

#[test]
fn missing_template_dir_yields_an_empty_set() {
    let templates = load_templates(Path::new("/definitely/not/here")).unwrap();
    assert!(templates.is_empty());
}

#[test]
fn exports_are_reproducible_byte_for_byte() {
    let tmp_a = tempfile::tempdir().unwrap();
    let tmp_b = tempfile::tempdir().unwrap();
    for tmp in [&tmp_a, &tmp_b] {
        export_batch(
            &[],
            &Theme::neon(),
            &DensityTable::default_tiers(),
            &densities(&["hdpi"]),
            tmp.path(),
            Provider::LocalDeterministic,
        )
        .unwrap();
    }
    let rel = "drawable-hdpi/pattern_head_shoulders.png";
    let a = std::fs::read(tmp_a.path().join(rel)).unwrap();
    let b = std::fs::read(tmp_b.path().join(rel)).unwrap();
    assert_eq!(a, b);
}
