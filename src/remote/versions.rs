//! Version metadata, version content, uploads and option mutations.

use super::*;

impl RemoteClient {
    pub fn version_info(&self, path: &LogicalPath) -> Result<VersionSet> {
        let resp = self
            .client
            .get(self.url(&["version", "info"], path)?)
            .header(PROTOCOL_VERSION_HEADER, PROTOCOL_VERSION)
            .send()
            .with_context(|| format!("version info {}", path))?;
        let set: VersionSet = self
            .ensure_ok(resp, "version info")?
            .json()
            .context("parse version info")?;
        Ok(set)
    }

    pub fn version_download(&self, path: &LogicalPath, token: VersionToken) -> Result<Vec<u8>> {
        let mut url = self.url(&["version", "download"], path)?;
        url.query_pairs_mut()
            .append_pair("version", &token.to_string());
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("version download {} ({})", path, token))?;
        let bytes = self
            .ensure_ok(resp, "version download")?
            .bytes()
            .context("read version bytes")?;
        Ok(bytes.to_vec())
    }

    /// Uploads `body` as a new version; the store answers with the updated set.
    pub fn upload_version(&self, path: &LogicalPath, body: Vec<u8>) -> Result<VersionSet> {
        let req = self
            .client
            .post(self.url(&["version", "upload"], path)?)
            .body(body);
        let resp = self
            .authorize(req)
            .send()
            .with_context(|| format!("upload version {}", path))?;
        let set: VersionSet = self
            .ensure_ok(resp, "upload version")?
            .json()
            .context("parse upload response")?;
        Ok(set)
    }

    pub fn set_options(&self, path: &LogicalPath, options: &VersionOptions) -> Result<VersionSet> {
        let req = self
            .client
            .put(self.url(&["version", "setOptions"], path)?)
            .header(PROTOCOL_VERSION_HEADER, PROTOCOL_VERSION)
            .json(options);
        let resp = self
            .authorize(req)
            .send()
            .with_context(|| format!("set options {} v{}", path, options.version))?;
        let set: VersionSet = self
            .ensure_ok(resp, "set options")?
            .json()
            .context("parse set options response")?;
        Ok(set)
    }
}
