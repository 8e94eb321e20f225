use std::fs;
use std::process::Command;

#[test]
fn compress_roundtrip_cli() {
    let exe = env!("CARGO_BIN_EXE_strata");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let compressed = dir.path().join("compressed.strata");
    let output = dir.path().join("output.bin");

    fs::write(&input, b"hello world hello world hello world").unwrap();

    let status = Command::new(exe)
        .args([
            "compress",
            input.to_str().unwrap(),
            compressed.to_str().unwrap(),
            "--level",
            "5",
        ])
        .status()
        .expect("compress failed");
    assert!(status.success());

    let status = Command::new(exe)
        .args([
            "decompress",
            compressed.to_str().unwrap(),
            output.to_str().unwrap(),
        ])
        .status()
        .expect("decompress failed");
    assert!(status.success());

    assert_eq!(fs::read(&input).unwrap(), fs::read(&output).unwrap());
}

#[test]
fn inspect_prints_frame_header_json() {
    let exe = env!("CARGO_BIN_EXE_strata");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.strata");
    fs::write(&path, strata::compress(b"inspect", 0).unwrap()).unwrap();

    let out = Command::new(exe)
        .args(["inspect", path.to_str().unwrap()])
        .output()
        .expect("inspect failed");
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("\"format_version\": 8"));
    assert!(text.contains("\"content_size\": 7"));
}

#[test]
fn decompress_rejects_garbage_with_nonzero_exit() {
    let exe = env!("CARGO_BIN_EXE_strata");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("garbage.bin");
    let output = dir.path().join("out.bin");
    fs::write(&input, b"definitely not a frame").unwrap();

    let status = Command::new(exe)
        .args([
            "decompress",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ])
        .status()
        .expect("spawn failed");
    assert!(!status.success());
}
