use prayer_times_bot::packaging::{DeclaredImage, ImageContract};
use std::collections::BTreeSet;
use std::path::Path;

fn repo_file(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

#[test]
fn test_image_declares_only_the_keep_alive_port() {
    let image = DeclaredImage::parse(&repo_file("Dockerfile")).unwrap();
    assert_eq!(image.exposed_ports, BTreeSet::from(["8080/tcp".to_string()]));
}

#[test]
fn test_image_runs_bot_without_arguments_in_app() {
    let image = DeclaredImage::parse(&repo_file("Dockerfile")).unwrap();
    assert_eq!(image.workdir.as_deref(), Some("/app"));
    assert_eq!(image.cmd, Some(vec!["prayer-times-bot".to_string()]));
}

#[test]
fn test_build_context_is_copied_into_app() {
    let text = repo_file("Dockerfile");
    let image = DeclaredImage::parse(&text).unwrap();
    assert!(ImageContract::default().check(&image).is_ok());

    // 只排除建置產物，原始碼與 manifest 都必須進入映像檔
    let ignored: Vec<String> = repo_file(".dockerignore")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    for required in ["Cargo.toml", "src", "Dockerfile"] {
        assert!(
            !ignored.iter().any(|pattern| pattern == required),
            "{} must stay in the build context",
            required
        );
    }
}

#[test]
fn test_builder_stage_removes_dependency_caches() {
    let text = repo_file("Dockerfile");
    assert!(text.contains("cargo build --release"));
    assert!(text.contains("rm -rf target \"$CARGO_HOME/registry\""));
    assert!(text.contains("rm -rf /var/lib/apt/lists/*"));
}
