use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use vfbrowse::remote::{AuthIdentity, RemoteClient, SharedCredentials};

pub const NOTES: &str = "first draft\n";
pub const README: &str = "# readme\n";

pub struct ServerGuard {
    pub base_url: String,
    pub token: String,
    _root: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl ServerGuard {
    /// Base URL in the form the library client expects.
    #[allow(dead_code)]
    pub fn api_base(&self) -> String {
        format!("{}/", self.base_url)
    }

    #[allow(dead_code)]
    pub fn credentials(&self, signed_in: bool) -> SharedCredentials {
        let identity = signed_in
            .then(|| AuthIdentity::new("dev", &self.token).expect("dev identity"));
        SharedCredentials::new(identity)
    }

    #[allow(dead_code)]
    pub fn client(&self, signed_in: bool) -> Result<RemoteClient> {
        RemoteClient::new(&self.api_base(), Arc::new(self.credentials(signed_in)))
    }
}

/// Seeds `docs/notes.txt` (versioned), `docs/readme.md` and `pics/cat.png`.
fn seed(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root.join("docs")).context("create docs")?;
    std::fs::create_dir_all(root.join("pics")).context("create pics")?;
    std::fs::write(root.join("docs/notes.txt"), NOTES).context("write notes")?;
    std::fs::write(root.join("docs/readme.md"), README).context("write readme")?;
    std::fs::write(root.join("pics/cat.png"), [0x89, b'P', b'N', b'G']).context("write png")?;
    Ok(())
}

pub fn spawn_server() -> Result<ServerGuard> {
    let root = tempfile::tempdir().context("create server tempdir")?;
    let token = "dev".to_string();

    let tree = root.path().join("tree");
    seed(&tree)?;
    let addr_file = root.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_vfbrowse-devstore"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--root",
            tree.to_str().unwrap(),
            "--versioned",
            "docs/*.txt",
            "--dev-token",
            &token,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn vfbrowse-devstore")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        token,
        _root: root,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

#[allow(dead_code)]
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
