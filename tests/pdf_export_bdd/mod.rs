//! Scenario state and stub renderers for PDF export behavioural tests.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use report_export::ExportError;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Shared scenario state for PDF export behaviour tests.
#[derive(ScenarioState, Default)]
pub(crate) struct PdfExportState {
    /// Temporary directory holding the stub renderer and the output.
    pub(crate) temp_dir: Slot<tempfile::TempDir>,
    /// Renderer binary handed to the exporter.
    pub(crate) binary_path: Slot<String>,
    /// Renderer timeout override, in seconds.
    pub(crate) timeout_seconds: Slot<u64>,
    /// Where the exporter resolved its output.
    pub(crate) full_path: Slot<Utf8PathBuf>,
    /// Outcome of the export.
    pub(crate) result: Slot<Result<Utf8PathBuf, ExportError>>,
}

/// Body of a renderer that prints a fake PDF to the path named in the script.
pub(crate) const WRITING_RENDERER: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --*) ;;
    *) script="$arg"; break ;;
  esac
done
output=$(sed -n 's/.*page\.render("\([^"]*\)").*/\1/p' "$script")
[ -n "$output" ] || { echo "no output path in $script" >&2; exit 4; }
printf '%%PDF-1.4 stub\n' > "$output"
"#;

/// Body of a renderer that fails with status 2.
pub(crate) const FAILING_RENDERER: &str = "#!/bin/sh\necho 'stub renderer crashed' >&2\nexit 2\n";

/// Body of a renderer that never exits on its own.
pub(crate) const HANGING_RENDERER: &str = "#!/bin/sh\nexec sleep 30\n";

/// Root of the scenario's temporary directory.
pub(crate) fn temp_root(temp_dir: &tempfile::TempDir) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
    Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
        .map_err(|_| "temporary directory path is not valid UTF-8".into())
}

/// Writes an executable stub renderer and returns its path.
pub(crate) fn write_renderer(
    root: &Utf8PathBuf,
    contents: &str,
) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
    use cap_std::fs::PermissionsExt;

    let name = "stub-renderer";
    let dir = Dir::open_ambient_dir(root, ambient_authority())?;
    dir.write(name, contents)?;

    let mut permissions = dir.metadata(name)?.permissions();
    permissions.set_mode(0o755);
    dir.set_permissions(name, permissions)?;

    Ok(root.join(name))
}
