// tests/integration_test.rs
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn git_changelog(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-changelog"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_git_changelog_help() {
    let dir = TempDir::new().unwrap();
    let output = git_changelog(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-changelog"));
    assert!(stdout.contains("Keep a CHANGELOG.md in step with semantic version tags"));
}

#[test]
fn test_git_changelog_version() {
    let dir = TempDir::new().unwrap();
    let output = git_changelog(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_init_add_release_latest() {
    let dir = TempDir::new().unwrap();

    let output = git_changelog(dir.path(), &["init"]);
    assert!(output.status.success(), "init failed: {:?}", output);
    assert!(dir.path().join("CHANGELOG.md").exists());

    let output = git_changelog(dir.path(), &["init"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("already exists"),
        "Message should mention the existing file, got: {}",
        stderr
    );

    let output = git_changelog(dir.path(), &["add", "Added", "Support", "for", "widgets"]);
    assert!(output.status.success(), "add failed: {:?}", output);

    let output = git_changelog(dir.path(), &["latest"]);
    assert!(!output.status.success());

    let output = git_changelog(dir.path(), &["release", "0.2.0", "--date", "2024-03-01"]);
    assert!(output.status.success(), "release failed: {:?}", output);

    let output = git_changelog(dir.path(), &["latest"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "0.2.0");

    let text = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(text.contains("## [0.2.0] - 2024-03-01\n\n### Added\n\n- Support for widgets\n"));
}

#[test]
fn test_cli_unknown_section() {
    let dir = TempDir::new().unwrap();
    git_changelog(dir.path(), &["init"]);

    let output = git_changelog(dir.path(), &["add", "Improved", "Something"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("Unknown changelog section"),
        "Message should name the problem, got: {}",
        stderr
    );
}

#[test]
fn test_cli_format_check() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("HISTORY.md");
    std::fs::write(&path, "# Changelog\n## [Unreleased]\n").unwrap();

    let output = git_changelog(dir.path(), &["--file", "HISTORY.md", "format", "--check"]);
    assert!(!output.status.success());

    let output = git_changelog(dir.path(), &["--file", "HISTORY.md", "format"]);
    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "# Changelog\n\n## [Unreleased]\n"
    );

    let output = git_changelog(dir.path(), &["-f", "HISTORY.md", "format", "--check"]);
    assert!(output.status.success());
}

#[test]
fn test_cli_missing_changelog() {
    let dir = TempDir::new().unwrap();
    let output = git_changelog(dir.path(), &["latest"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Changelog not found"), "got: {}", stderr);
}

#[cfg(test)]
mod git_operations_tests {
    use super::*;
    use chrono::NaiveDate;
    use git2::Repository;
    use git_changelog::boundary::BoundaryWarning;
    use git_changelog::changelog::ChangelogEngine;
    use git_changelog::cli::{run_bump, BumpWorkflowArgs, WorkflowResult};
    use git_changelog::config::Config;
    use git_changelog::git::{Git2Repository, VersionControl};
    use git_changelog::VersionBump;
    use std::fs;

    const CHANGELOG: &str = "# Changelog

## [Unreleased]

## [1.0.0] - 2024-01-01

### Added

- Initial release
";

    // Helper function to setup a temporary git repo with a tagged changelog
    fn setup_test_repo() -> TempDir {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        fs::write(temp_dir.path().join("CHANGELOG.md"), CHANGELOG)
            .expect("Could not write changelog");
        fs::write(temp_dir.path().join("README.md"), "Initial content\n")
            .expect("Could not write readme");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("CHANGELOG.md"))
            .expect("Could not add file to index");
        index
            .add_path(Path::new("README.md"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");
        let signature = repo.signature().expect("Could not get sig");

        let commit_id = repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                "Initial commit",
                &tree,
                &[],
            )
            .expect("Could not create commit");

        repo.tag_lightweight("v1.0.0", &repo.find_object(commit_id, None).unwrap(), false)
            .expect("Could not create tag");

        temp_dir
    }

    fn bump_args(dir: &Path) -> BumpWorkflowArgs {
        BumpWorkflowArgs {
            bump: VersionBump::Minor,
            changelog_path: dir.join("CHANGELOG.md"),
            date: NaiveDate::from_ymd_opt(2024, 7, 1),
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_git_repo_operations() {
        let temp_dir = setup_test_repo();
        let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

        assert_eq!(repo.current_version().unwrap(), "v1.0.0");
        assert!(!repo.has_uncommitted_changes(None).unwrap());
        assert_eq!(repo.remote_url("origin").unwrap(), None);
    }

    #[test]
    fn test_bump_commits_and_tags_release() {
        let temp_dir = setup_test_repo();
        let path = temp_dir.path().join("CHANGELOG.md");

        // Entry added since the last release; the changelog itself may be dirty
        ChangelogEngine::default()
            .add_entry(&path, "Added", "Widgets")
            .unwrap();

        let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");
        assert!(repo.has_uncommitted_changes(None).unwrap());
        assert!(!repo.has_uncommitted_changes(Some(&path)).unwrap());

        let result = run_bump(
            &bump_args(temp_dir.path()),
            &Config::default(),
            &repo,
            |warning: &BoundaryWarning| Ok(!warning.needs_confirmation()),
        )
        .unwrap();

        let outcome = match result {
            WorkflowResult::Released(outcome) => outcome,
            WorkflowResult::Cancelled(warning) => panic!("workflow cancelled: {}", warning),
        };
        assert_eq!(outcome.version, "v1.1.0");
        assert!(outcome.committed && outcome.tagged);

        assert_eq!(repo.current_version().unwrap(), "v1.1.0");
        assert!(!repo.has_uncommitted_changes(None).unwrap());

        let git = Repository::open(temp_dir.path()).unwrap();
        let head = git.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("chore(release): v1.1.0"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("## [v1.1.0] - 2024-07-01\n\n### Added\n\n- Widgets\n"));
    }

    #[test]
    fn test_bump_refuses_dirty_tree() {
        let temp_dir = setup_test_repo();
        fs::write(temp_dir.path().join("README.md"), "Changed\n").unwrap();

        let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");
        let before = fs::read_to_string(temp_dir.path().join("CHANGELOG.md")).unwrap();

        let result = run_bump(
            &bump_args(temp_dir.path()),
            &Config::default(),
            &repo,
            |_: &BoundaryWarning| Ok(false),
        )
        .unwrap();

        assert_eq!(
            result,
            WorkflowResult::Cancelled(BoundaryWarning::UncommittedChanges)
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("CHANGELOG.md")).unwrap(),
            before
        );
        assert_eq!(repo.current_version().unwrap(), "v1.0.0");
    }
}
