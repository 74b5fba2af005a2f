// tests/engine_test.rs
use chrono::NaiveDate;
use git_changelog::changelog::{self, ChangelogEngine, LinkTarget, Provider};
use git_changelog::ChangelogError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_changelog() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    ChangelogEngine::default().init(&path).unwrap();
    (dir, path)
}

fn github_engine() -> ChangelogEngine {
    ChangelogEngine::new(Some(LinkTarget::new(Provider::GitHub, "owner/repo")))
}

fn date(s: &str) -> Option<NaiveDate> {
    Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
}

#[test]
fn test_init_writes_skeleton() {
    let (_dir, path) = setup_changelog();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, changelog::skeleton());
    assert!(text.contains("## [Unreleased]"));
}

#[test]
fn test_init_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    fs::write(&path, "hand written\n").unwrap();

    let err = ChangelogEngine::default().init(&path).unwrap_err();
    assert!(matches!(err, ChangelogError::AlreadyExists(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "hand written\n");
}

#[test]
fn test_add_entry_to_file() {
    let (_dir, path) = setup_changelog();
    let engine = github_engine();

    assert!(!engine.add_entry(&path, "Fixed", "Crash on empty input").unwrap());
    assert!(!engine.add_entry(&path, "Added", "Dark mode").unwrap());

    let text = fs::read_to_string(&path).unwrap();
    let added = text.find("### Added").unwrap();
    let fixed = text.find("### Fixed").unwrap();
    assert!(added < fixed, "Added should come before Fixed, got: {}", text);
    assert!(text.contains("- Crash on empty input\n"));
    assert!(text.contains("- Dark mode\n"));
}

#[test]
fn test_add_duplicate_entry_leaves_file_untouched() {
    let (_dir, path) = setup_changelog();
    let engine = ChangelogEngine::default();

    engine.add_entry(&path, "Added", "Dark mode").unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(engine.add_entry(&path, "Added", "Dark mode").unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(before.matches("- Dark mode").count(), 1);
}

#[test]
fn test_add_entry_with_trailing_whitespace_twice() {
    let (_dir, path) = setup_changelog();
    let engine = ChangelogEngine::default();

    assert!(!engine.add_entry(&path, "Added", "X ").unwrap());
    assert!(engine.add_entry(&path, "Added", "X ").unwrap());
    assert!(engine.add_entry(&path, "Added", "X").unwrap());

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("- X").count(), 1, "got: {}", text);
}

#[test]
fn test_add_multiline_entry_twice() {
    let (_dir, path) = setup_changelog();
    let engine = ChangelogEngine::default();

    assert!(!engine.add_entry(&path, "Fixed", "Crash on start\nwhen offline").unwrap());
    assert!(engine.add_entry(&path, "Fixed", "Crash on start\nwhen offline").unwrap());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("### Fixed\n\n- Crash on start\n  when offline\n"), "got: {}", text);
    assert_eq!(text.matches("when offline").count(), 1);
}

#[test]
fn test_add_empty_entry_leaves_file_untouched() {
    let (_dir, path) = setup_changelog();
    let before = fs::read_to_string(&path).unwrap();

    for content in ["", "  "] {
        let err = ChangelogEngine::default()
            .add_entry(&path, "Added", content)
            .unwrap_err();
        assert!(matches!(err, ChangelogError::EmptyEntry));
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_add_entry_unknown_section_leaves_file_untouched() {
    let (_dir, path) = setup_changelog();
    let before = fs::read_to_string(&path).unwrap();

    let err = ChangelogEngine::default()
        .add_entry(&path, "Misc", "Something")
        .unwrap_err();
    assert!(matches!(err, ChangelogError::UnknownSection(ref s) if s == "Misc"));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_add_entry_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");

    let err = ChangelogEngine::default()
        .add_entry(&path, "Added", "Something")
        .unwrap_err();
    assert!(matches!(err, ChangelogError::NotFound(_)));
    assert!(!path.exists());
}

#[test]
fn test_release_moves_unreleased_content() {
    let (_dir, path) = setup_changelog();
    let engine = github_engine();
    engine.add_entry(&path, "Added", "New thing").unwrap();

    engine.release(&path, "1.0.0", date("2024-05-01")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let unreleased = text.find("## [Unreleased]").unwrap();
    let release = text.find("## [1.0.0] - 2024-05-01").unwrap();
    let entry = text.find("- New thing").unwrap();
    assert!(unreleased < release && release < entry);
    assert!(text.contains("[Unreleased]: https://github.com/owner/repo/compare/1.0.0...HEAD\n"));
    assert!(text.ends_with("[1.0.0]: https://github.com/owner/repo/releases/tag/1.0.0\n"));
    assert_eq!(changelog::latest_released_version(&text).unwrap(), "1.0.0");
}

#[test]
fn test_second_release_adds_compare_link() {
    let (_dir, path) = setup_changelog();
    let engine = github_engine();
    engine.add_entry(&path, "Added", "First").unwrap();
    engine.release(&path, "1.0.0", date("2024-05-01")).unwrap();
    engine.add_entry(&path, "Fixed", "Second").unwrap();
    engine.release(&path, "1.0.1", date("2024-05-02")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[Unreleased]: https://github.com/owner/repo/compare/1.0.1...HEAD"));
    assert!(text.contains("[1.0.1]: https://github.com/owner/repo/compare/1.0.0...1.0.1"));
    assert!(text.contains("[1.0.0]: https://github.com/owner/repo/releases/tag/1.0.0"));
    assert_eq!(changelog::latest_released_version(&text).unwrap(), "1.0.1");
}

#[test]
fn test_release_failures_leave_file_untouched() {
    let (_dir, path) = setup_changelog();
    let engine = github_engine();
    engine.add_entry(&path, "Added", "New thing").unwrap();
    engine.release(&path, "1.0.0", date("2024-05-01")).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = engine.release(&path, "  ", None).unwrap_err();
    assert!(matches!(err, ChangelogError::NoVersionToken));

    let err = engine.release(&path, "1.0.0", None).unwrap_err();
    assert!(matches!(err, ChangelogError::AlreadyReleased(_)));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_release_without_unreleased_heading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    let original = "# Changelog\n\n## [1.0.0] - 2024-01-01\n\n### Added\n\n- Thing\n";
    fs::write(&path, original).unwrap();

    let err = ChangelogEngine::default()
        .release(&path, "1.1.0", None)
        .unwrap_err();
    assert!(matches!(err, ChangelogError::MalformedDocument(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_release_without_link_target_keeps_links() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    fs::write(
        &path,
        "# Changelog\n\n## [Unreleased]\n\n### Added\n\n- Thing\n\n\
         [Unreleased]: https://example.com/compare\n",
    )
    .unwrap();

    ChangelogEngine::default()
        .release(&path, "0.1.0", date("2024-01-01"))
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("## [0.1.0] - 2024-01-01"));
    assert!(text.ends_with("[Unreleased]: https://example.com/compare\n"));
}

#[test]
fn test_format_file_check_and_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    let messy = "# Changelog\n## [Unreleased]\n### Added\n- Thing   \n\n\n\n";
    fs::write(&path, messy).unwrap();

    let engine = ChangelogEngine::default();
    assert!(engine.format_file(&path, true).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), messy);

    assert!(engine.format_file(&path, false).unwrap());
    let formatted = fs::read_to_string(&path).unwrap();
    assert_eq!(
        formatted,
        "# Changelog\n\n## [Unreleased]\n\n### Added\n\n- Thing\n"
    );
    assert!(!engine.format_file(&path, true).unwrap());
}
