//! Helpers for swap testing
//!
//! Fake binaries and shell scripts standing in for real executables in
//! the rename/relaunch/rollback sequence.

use std::fs;
use std::io::Write;
use std::path::Path;

/// Create a fake binary file with the given content
pub fn create_fake_binary(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Create a script that exits with the given code when launched
#[cfg(unix)]
pub fn create_exit_script(path: &Path, code: i32) -> std::io::Result<()> {
    let script = format!("#!/bin/sh\nexit {code}\n");
    create_fake_binary(path, script.as_bytes())
}

/// Shell script bytes that exit with the given code (for download
/// bodies that must behave as runnable binaries after install)
pub fn exit_script_bytes(code: i32) -> Vec<u8> {
    format!("#!/bin/sh\nexit {code}\n").into_bytes()
}
