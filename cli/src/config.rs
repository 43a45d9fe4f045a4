use std::path::Path;

use serde::Deserialize;

/// Optional `mdcheck.toml` in the scanned root. Command-line flags take
/// precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Findings affect the exit code. Defaults to true.
    #[serde(default)]
    pub fail_on_warning: Option<bool>,

    /// Run only the SQL block checks.
    #[serde(default)]
    pub sql_only: Option<bool>,
}

/// Load `mdcheck.toml` from `root` if present; an absent file is an empty
/// config, a malformed one is an error.
pub fn load(root: &Path) -> Result<Config, String> {
    let path = root.join("mdcheck.toml");
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(format!("cannot read '{}': {}", path.display(), e)),
    };
    toml::from_str(&text).map_err(|e| format!("TOML parse error in '{}': {}", path.display(), e))
}
