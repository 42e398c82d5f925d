#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use rotato_adapter_ansible::AnsibleRunner;
use rotato_ports::{AutomationRunnerPort, PlaybookRequest};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn request(host: &str, ident: &str) -> PlaybookRequest {
    PlaybookRequest {
        host: host.to_string(),
        playbook: "apt_upgrade.yml".to_string(),
        ident: ident.to_string(),
    }
}

// The scripts see: run <dir> -p <playbook> --ident <ident>
// Everything lives in one test so no script is written while another
// process is being spawned.
#[tokio::test]
async fn reads_status_from_the_runner_artifacts() {
    let bin = tempfile::tempdir().unwrap();
    let successful = write_script(
        bin.path(),
        "successful.sh",
        r#"mkdir -p "$2/artifacts/$6"
cp "$2/inventory/hosts" "$2/artifacts/$6/inventory"
echo "$4" > "$2/artifacts/$6/playbook"
printf 'successful\n' > "$2/artifacts/$6/status""#,
    );
    let failed = write_script(
        bin.path(),
        "failed.sh",
        r#"mkdir -p "$2/artifacts/$6"
printf 'failed' > "$2/artifacts/$6/status"
echo "fatal: host unreachable" >&2
exit 2"#,
    );
    let silent_ok = write_script(bin.path(), "silent_ok.sh", "exit 0");
    let silent_err = write_script(bin.path(), "silent_err.sh", "exit 3");

    let work = tempfile::tempdir().unwrap();
    let runner = |script: &PathBuf| {
        AnsibleRunner::new(script.display().to_string(), work.path().to_path_buf())
    };

    let ok = runner(&successful);
    ok.clear_stale_artifacts().unwrap();
    let status = ok.run_playbook(&request("10.0.0.1", "upgrade-10.0.0.1")).await.unwrap();
    assert_eq!(status, "successful");
    let artifacts = work.path().join("artifacts").join("upgrade-10.0.0.1");
    assert_eq!(
        fs::read_to_string(artifacts.join("inventory")).unwrap(),
        "[targets]\n10.0.0.1\n"
    );
    assert_eq!(
        fs::read_to_string(artifacts.join("playbook")).unwrap().trim(),
        "apt_upgrade.yml"
    );

    let bad = runner(&failed);
    bad.clear_stale_artifacts().unwrap();
    assert!(!artifacts.exists());
    let status = bad.run_playbook(&request("10.0.0.2", "upgrade-10.0.0.2")).await.unwrap();
    assert_eq!(status, "failed");

    let quiet = runner(&silent_ok);
    quiet.clear_stale_artifacts().unwrap();
    assert_eq!(
        quiet.run_playbook(&request("10.0.0.3", "upgrade-10.0.0.3")).await.unwrap(),
        "successful"
    );

    let broken = runner(&silent_err);
    broken.clear_stale_artifacts().unwrap();
    assert_eq!(
        broken.run_playbook(&request("10.0.0.3", "upgrade-10.0.0.3")).await.unwrap(),
        "failed"
    );

    let missing = AnsibleRunner::new("/nonexistent/ansible-runner", work.path().to_path_buf());
    missing.clear_stale_artifacts().unwrap();
    let err = missing
        .run_playbook(&request("10.0.0.1", "reboot-10.0.0.1"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to launch"));
}
