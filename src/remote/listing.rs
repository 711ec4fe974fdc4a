//! Directory listing and plain file download.

use super::*;

impl RemoteClient {
    pub fn list(&self, path: &LogicalPath) -> Result<Descriptor> {
        let resp = self
            .client
            .get(self.url(&["list"], path)?)
            .send()
            .with_context(|| format!("list {}", path))?;
        let descriptor: Descriptor = self
            .ensure_ok(resp, "list")?
            .json()
            .context("parse listing")?;
        Ok(descriptor)
    }

    pub fn download(&self, path: &LogicalPath) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(self.url(&["download"], path)?)
            .send()
            .with_context(|| format!("download {}", path))?;
        let bytes = self
            .ensure_ok(resp, "download")?
            .bytes()
            .context("read download bytes")?;
        Ok(bytes.to_vec())
    }
}
