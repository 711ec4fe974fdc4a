use std::io::Write;

use anyhow::{Context, Result};

use vfbrowse::fmt::{format_size, format_timestamp_ms};
use vfbrowse::model::{Descriptor, VersionOptions, VersionSet, VersionToken};
use vfbrowse::remote::{CredentialProvider, RemoteClient};

use crate::Commands;
use crate::cli_runtime::{Settings, parse_path};

pub(crate) fn handle_command(settings: &Settings, command: Commands) -> Result<()> {
    let client = settings.client()?;
    match command {
        Commands::Browse { .. } => anyhow::bail!("browse runs the interactive shell"),
        Commands::Ls { path, json } => {
            let path = parse_path(&path)?;
            let descriptor = client.list(&path)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&descriptor).context("serialize listing json")?
                );
                return Ok(());
            }
            match descriptor {
                Descriptor::Directory { children } => {
                    if children.is_empty() {
                        println!("(empty)");
                    }
                    for child in children {
                        println!(
                            "{: <40} {: >10}  {}",
                            child.name,
                            format_size(child.size),
                            format_timestamp_ms(child.last_modified)
                        );
                    }
                }
                Descriptor::File(info) => {
                    println!("name: {}", info.name);
                    println!("size: {}", format_size(info.size));
                    println!("modified: {}", format_timestamp_ms(info.last_modified));
                    println!("type: {}", info.mime_type.as_deref().unwrap_or("unknown"));
                    println!("versioned: {}", info.versioned_file);
                }
            }
        }
        Commands::Cat { path, version } => {
            let path = parse_path(&path)?;
            let bytes = match version {
                Some(token) => {
                    let token: VersionToken = token.parse()?;
                    client.version_download(&path, token)?
                }
                None => client.download(&path)?,
            };
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes).context("write stdout")?;
            out.flush().context("flush stdout")?;
        }
        Commands::Versions { path, all, json } => {
            let path = parse_path(&path)?;
            let set = client.version_info(&path)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&set).context("serialize versions json")?
                );
            } else {
                print_versions(&set, all);
            }
        }
        Commands::Upload { path, file } => {
            require_identity(&client)?;
            let path = parse_path(&path)?;
            let body =
                std::fs::read(&file).with_context(|| format!("read {}", file.display()))?;
            let set = client.upload_version(&path, body)?;
            match set.latest {
                Some(v) => println!("Uploaded version {}", v),
                None => println!("Uploaded"),
            }
        }
        Commands::SetDefault { path, version } => {
            let set = mutate(&client, &path, VersionOptions::make_default(version))?;
            println!(
                "Default is now version {}",
                set.default.map(|v| v.to_string()).unwrap_or_default()
            );
        }
        Commands::Hide { path, version } => {
            mutate(&client, &path, VersionOptions::hidden(version, true))?;
            println!("Version {} hidden", version);
        }
        Commands::Unhide { path, version } => {
            mutate(&client, &path, VersionOptions::hidden(version, false))?;
            println!("Version {} visible", version);
        }
        Commands::Comment {
            path,
            version,
            text,
        } => {
            mutate(&client, &path, VersionOptions::comment(version, text))?;
            println!("Comment updated on version {}", version);
        }
    }
    Ok(())
}

fn require_identity(client: &RemoteClient) -> Result<()> {
    if !client.credentials().allows_changes() {
        anyhow::bail!("sign in with --user and --token (or VFBROWSE_TOKEN) to change versions");
    }
    Ok(())
}

fn mutate(client: &RemoteClient, path: &str, options: VersionOptions) -> Result<VersionSet> {
    require_identity(client)?;
    let path = parse_path(path)?;
    client.set_options(&path, &options)
}

fn print_versions(set: &VersionSet, all: bool) {
    for v in set.visible(all) {
        let mut tags = Vec::new();
        if set.is_default(v.version) {
            tags.push("default");
        }
        if set.is_latest(v.version) {
            tags.push("latest");
        }
        if v.hidden {
            tags.push("hidden");
        }
        println!(
            "{: >4}  {: >10}  {}  {: <16} {}",
            v.version,
            format_size(v.size),
            format_timestamp_ms(v.last_modified),
            tags.join(","),
            v.comment
        );
    }
}
