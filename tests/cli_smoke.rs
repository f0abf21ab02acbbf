use std::path::PathBuf;

fn bin() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_patternart")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "patternart.exe"
            } else {
                "patternart"
            });
            p
        })
}

#[test]
fn cli_render_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("bull_flag.png");
    let _ = std::fs::remove_file(&out_path);

    let out_arg = out_path.to_string_lossy().to_string();
    let status = std::process::Command::new(bin())
        .args(["render", "--name", "bull_flag", "--density", "xhdpi", "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (640, 480));
}

#[test]
fn cli_export_fills_density_directories() {
    let dir = PathBuf::from("target").join("cli_smoke_export");
    let _ = std::fs::remove_dir_all(&dir);

    let out_arg = dir.to_string_lossy().to_string();
    let status = std::process::Command::new(bin())
        .args([
            "export",
            "--templates",
            "no_such_dir",
            "--densities",
            "mdpi,hdpi",
            "--out",
        ])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    assert!(dir.join("drawable/pattern_bull_flag.png").is_file());
    assert!(dir.join("drawable-hdpi/pattern_head_shoulders.png").is_file());
}

#[test]
fn cli_rejects_unknown_density() {
    let status = std::process::Command::new(bin())
        .args([
            "export",
            "--templates",
            "no_such_dir",
            "--densities",
            "retina",
            "--out",
            "target/cli_smoke_bad",
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}
