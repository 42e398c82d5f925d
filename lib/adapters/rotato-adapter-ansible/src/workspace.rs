//! Layout of the runner's private data directory.
//!
//! ```text
//! <dir>/inventory/hosts            single-host inventory, rewritten per run
//! <dir>/project/<playbook>         playbooks, managed outside this crate
//! <dir>/artifacts/<ident>/status   completion status written by the runner
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directories a previous run leaves behind.
const STALE_DIRS: [&str; 2] = ["artifacts", "inventory"];

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.root.join("inventory").join("hosts")
    }

    pub fn status_path(&self, ident: &str) -> PathBuf {
        self.root.join("artifacts").join(ident).join("status")
    }

    /// Remove leftovers of a previous run, including files it left
    /// read-only.
    pub fn clear(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        for name in STALE_DIRS {
            let path = self.root.join(name);
            if fs::symlink_metadata(&path).is_err() {
                continue;
            }
            make_writable(&path)?;
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Write an inventory containing exactly `host`.
    pub fn stage_inventory(&self, host: &str) -> io::Result<()> {
        let path = self.inventory_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format!("[targets]\n{host}\n"))
    }

    /// Status recorded for `ident`, if the runner wrote one.
    pub fn read_status(&self, ident: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.status_path(ident)) {
            Ok(raw) => Ok(Some(raw.trim().to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn make_writable(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }
    grant_owner_write(path, &metadata)?;
    if metadata.is_dir() {
        for entry in fs::read_dir(path)? {
            make_writable(&entry?.path())?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn grant_owner_write(path: &Path, metadata: &fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = metadata.permissions();
    let mode = permissions.mode();
    let wanted = if metadata.is_dir() { mode | 0o700 } else { mode | 0o600 };
    if wanted != mode {
        permissions.set_mode(wanted);
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn grant_owner_write(path: &Path, metadata: &fs::Metadata) -> io::Result<()> {
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_removes_read_only_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf());
        let leftover = workspace.status_path("upgrade-10.0.0.1");
        fs::create_dir_all(leftover.parent().unwrap()).unwrap();
        fs::write(&leftover, "failed").unwrap();
        workspace.stage_inventory("10.0.0.1").unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&leftover, fs::Permissions::from_mode(0o400)).unwrap();
            fs::set_permissions(leftover.parent().unwrap(), fs::Permissions::from_mode(0o500))
                .unwrap();
        }

        workspace.clear().unwrap();
        assert!(!dir.path().join("artifacts").exists());
        assert!(!dir.path().join("inventory").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn clear_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("runner"));
        workspace.clear().unwrap();
        assert!(workspace.root().is_dir());
    }

    #[test]
    fn inventory_holds_a_single_host() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf());
        workspace.stage_inventory("10.0.0.1").unwrap();
        workspace.stage_inventory("10.0.0.2").unwrap();
        let inventory = fs::read_to_string(workspace.inventory_path()).unwrap();
        assert_eq!(inventory, "[targets]\n10.0.0.2\n");
    }

    #[test]
    fn status_is_trimmed_and_optional() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf());
        assert_eq!(workspace.read_status("reboot-a").unwrap(), None);

        let path = workspace.status_path("reboot-a");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "successful\n").unwrap();
        assert_eq!(
            workspace.read_status("reboot-a").unwrap().as_deref(),
            Some("successful")
        );
    }
}
