//! Decryption of SOPS-encrypted YAML through the external `sops` binary.

use std::process::Command;

use camino::Utf8Path;

use super::BackendError;

const SOPS_BINARY: &str = "sops";

/// Run `sops -d` on `path` and return the decrypted YAML.
pub(super) fn decrypt(path: &Utf8Path) -> Result<String, BackendError> {
    tracing::debug!(path = %path, "decrypting with sops");
    let output = Command::new(SOPS_BINARY)
        .args(["--input-type=yaml", "--output-type=yaml", "-d"])
        .arg(path.as_str())
        .output()
        .map_err(|err| format!("failed to run `{SOPS_BINARY}`: {err}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`{SOPS_BINARY}` exited with {}: {}",
            output.status,
            stderr.trim()
        )
        .into());
    }
    Ok(String::from_utf8(output.stdout)?)
}
