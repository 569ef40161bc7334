// file: src/runner/locate.rs
// description: resolve a program name the way the shell would via PATH
// reference: execvp lookup rules

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Returns the executable a program name resolves to. Names containing a
/// path separator are checked as given; bare names are searched in `PATH`.
pub fn locate_program(program: &str) -> Option<PathBuf> {
    locate_in(program, env::var_os("PATH").as_deref())
}

pub fn locate_in(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
