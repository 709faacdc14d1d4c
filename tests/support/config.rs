use std::fs;
use std::path::{Path, PathBuf};

pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("signalsync.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

pub fn config_for(url: &str, output: &Path) -> String {
    format!(
        "[source]\nurl = \"{url}\"\n\n[polling]\ninterval_secs = 0.2\n\n[http]\ntimeout_secs = 2\n\n[output]\npath = '{}'\n",
        output.display()
    )
}
