//! Unit tests for output directory and filename resolution.

use std::sync::Arc;

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::export::environment::MockExportEnvironment;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const GENERATED: &str = "report-0123456789abcdef";

struct Sandbox {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
    fallback: Utf8PathBuf,
}

impl Sandbox {
    fn environment(&self) -> Arc<dyn ExportEnvironment> {
        let fallback = self.fallback.clone();
        let mut environment = MockExportEnvironment::new();
        environment
            .expect_temp_dir()
            .returning(move || fallback.clone());
        environment
            .expect_generated_file_name()
            .returning(|| GENERATED.to_owned());
        Arc::new(environment)
    }

    fn fallback_path(&self) -> String {
        format!("{}{}", self.fallback, std::path::MAIN_SEPARATOR)
    }

    fn root_dir(&self) -> Result<Dir, Box<dyn std::error::Error>> {
        Ok(Dir::open_ambient_dir(&self.root, ambient_authority())?)
    }
}

#[fixture]
fn sandbox() -> Sandbox {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
        .expect("temporary directory path must be UTF-8");
    let fallback = root.join("fallback");
    std::fs::create_dir(&fallback).expect("failed to create fallback directory");
    Sandbox {
        _temp_dir: temp_dir,
        root,
        fallback,
    }
}

#[cfg(unix)]
fn make_read_only(dir: &Dir, entry: &str) -> TestResult {
    use cap_std::fs::PermissionsExt;

    let mut permissions = dir.metadata(entry)?.permissions();
    let mode = if dir.metadata(entry)?.is_dir() { 0o555 } else { 0o444 };
    permissions.set_mode(mode);
    dir.set_permissions(entry, permissions)?;
    Ok(())
}

#[rstest]
fn empty_path_resolves_to_temp_directory(sandbox: Sandbox) {
    let location = OutputLocation::resolve("", "invoice", ".pdf", sandbox.environment());

    assert_eq!(location.path(), sandbox.fallback_path());
    assert_eq!(
        location.full_path(),
        Utf8PathBuf::from(format!("{}invoice.pdf", sandbox.fallback_path()))
    );
}

#[rstest]
#[case::no_separator("out")]
#[case::one_separator("out/")]
#[case::many_separators("out///")]
fn path_ends_in_exactly_one_separator(sandbox: Sandbox, #[case] suffix: &str) {
    let requested = format!("{}/{suffix}", sandbox.root);

    let location = OutputLocation::resolve(&requested, "invoice", ".pdf", sandbox.environment());

    assert_eq!(
        location.path(),
        format!("{}/out{}", sandbox.root, std::path::MAIN_SEPARATOR)
    );
}

#[rstest]
fn missing_directories_are_created(sandbox: Sandbox) -> TestResult {
    let requested = sandbox.root.join("nested").join("reports");

    let location =
        OutputLocation::resolve(requested.as_str(), "invoice", ".pdf", sandbox.environment());

    assert_eq!(location.path(), format!("{requested}/"));
    assert!(sandbox.root_dir()?.metadata("nested/reports")?.is_dir());
    Ok(())
}

#[rstest]
fn path_naming_an_existing_file_falls_back(sandbox: Sandbox) -> TestResult {
    sandbox.root_dir()?.write("occupied", "not a directory")?;
    let requested = sandbox.root.join("occupied");

    let location =
        OutputLocation::resolve(requested.as_str(), "invoice", ".pdf", sandbox.environment());

    assert_eq!(location.path(), sandbox.fallback_path());
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn read_only_directory_falls_back(sandbox: Sandbox) -> TestResult {
    let root_dir = sandbox.root_dir()?;
    root_dir.create_dir("locked")?;
    make_read_only(&root_dir, "locked")?;
    let requested = sandbox.root.join("locked");

    let location =
        OutputLocation::resolve(requested.as_str(), "invoice", ".pdf", sandbox.environment());

    assert_eq!(location.path(), sandbox.fallback_path());
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn directory_reached_through_symlink_is_kept(sandbox: Sandbox) -> TestResult {
    sandbox.root_dir()?.create_dir("real")?;
    let link = sandbox.root.join("link");
    std::os::unix::fs::symlink(sandbox.root.join("real"), &link)?;

    let location = OutputLocation::resolve(link.as_str(), "invoice", ".pdf", sandbox.environment());

    assert_eq!(location.path(), format!("{link}/"));
    assert!(sandbox.root_dir()?.metadata("real/invoice.pdf")?.is_file());
    Ok(())
}

#[rstest]
fn path_is_absolute_for_relative_request(sandbox: Sandbox) -> TestResult {
    let current = Utf8PathBuf::from_path_buf(std::env::current_dir()?)
        .map_err(|path| format!("non UTF-8 working directory: {}", path.display()))?;

    let location = OutputLocation::resolve(".", "", ".pdf", sandbox.environment());

    assert_eq!(
        location.path(),
        format!("{current}{}", std::path::MAIN_SEPARATOR)
    );
    assert!(Utf8PathBuf::from(location.path()).is_absolute());
    Ok(())
}

#[rstest]
fn set_path_touches_target_once_filename_is_known(sandbox: Sandbox) -> TestResult {
    let mut location = OutputLocation::resolve("", "invoice", ".pdf", sandbox.environment());
    sandbox.root_dir()?.create_dir("later")?;

    location.set_path(sandbox.root.join("later").as_str());

    assert_eq!(location.path(), format!("{}/later/", sandbox.root));
    assert!(sandbox.root_dir()?.metadata("later/invoice.pdf")?.is_file());
    Ok(())
}

#[rstest]
fn empty_file_name_is_generated(sandbox: Sandbox) {
    let location = OutputLocation::resolve(
        sandbox.root.as_str(),
        "",
        ".pdf",
        sandbox.environment(),
    );

    assert_eq!(location.file_name(), GENERATED);
    assert!(location.file_name().starts_with("report-"));
}

#[rstest]
#[case::forward_slash("../escape")]
#[case::backslash("nested\\name")]
fn file_name_with_separator_is_generated(sandbox: Sandbox, #[case] name: &str) {
    let location =
        OutputLocation::resolve(sandbox.root.as_str(), name, ".pdf", sandbox.environment());

    assert_eq!(location.file_name(), GENERATED);
}

#[rstest]
fn writable_existing_target_keeps_its_name(sandbox: Sandbox) -> TestResult {
    sandbox.root_dir()?.write("invoice.pdf", "old output")?;

    let location = OutputLocation::resolve(
        sandbox.root.as_str(),
        "invoice",
        ".pdf",
        sandbox.environment(),
    );

    assert_eq!(location.file_name(), "invoice");
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn read_only_existing_target_is_renamed(sandbox: Sandbox) -> TestResult {
    let root_dir = sandbox.root_dir()?;
    root_dir.write("invoice.pdf", "old output")?;
    make_read_only(&root_dir, "invoice.pdf")?;

    let location = OutputLocation::resolve(
        sandbox.root.as_str(),
        "invoice",
        ".pdf",
        sandbox.environment(),
    );

    assert_eq!(location.file_name(), GENERATED);
    Ok(())
}

#[rstest]
fn full_path_joins_path_name_and_extension(sandbox: Sandbox) {
    let location = OutputLocation::resolve(
        sandbox.root.as_str(),
        "quarterly",
        ".pdf",
        sandbox.environment(),
    );

    assert_eq!(
        location.full_path().as_str(),
        format!("{}/quarterly.pdf", sandbox.root)
    );
    assert_eq!(location.extension(), ".pdf");
}

#[rstest]
fn system_environment_generates_report_names() {
    let location = OutputLocation::resolve(
        "",
        "",
        ".pdf",
        Arc::new(crate::export::environment::SystemEnvironment),
    );

    let hash = location
        .file_name()
        .strip_prefix("report-")
        .unwrap_or_default();
    assert!(!hash.is_empty());
}
