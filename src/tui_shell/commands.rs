use anyhow::{Context, Result};

use crate::model::VersionToken;

#[derive(Clone, Copy, Debug)]
pub(super) struct CommandDef {
    pub(super) name: &'static str,
    pub(super) aliases: &'static [&'static str],
    pub(super) usage: &'static str,
    pub(super) help: &'static str,
}

pub(super) fn command_defs() -> Vec<CommandDef> {
    vec![
        CommandDef {
            name: "help",
            aliases: &["h", "?"],
            usage: "help",
            help: "List commands",
        },
        CommandDef {
            name: "login",
            aliases: &[],
            usage: "login USER TOKEN",
            help: "Sign in with a bearer token",
        },
        CommandDef {
            name: "logout",
            aliases: &[],
            usage: "logout",
            help: "Forget the signed-in identity",
        },
        CommandDef {
            name: "token",
            aliases: &[],
            usage: "token TOKEN",
            help: "Replace the bearer token",
        },
        CommandDef {
            name: "open",
            aliases: &["o"],
            usage: "open NAME",
            help: "Open a child of the current folder",
        },
        CommandDef {
            name: "crumb",
            aliases: &["up"],
            usage: "crumb INDEX",
            help: "Jump to a breadcrumb",
        },
        CommandDef {
            name: "back",
            aliases: &[],
            usage: "back",
            help: "History back",
        },
        CommandDef {
            name: "forward",
            aliases: &[],
            usage: "forward",
            help: "History forward",
        },
        CommandDef {
            name: "select",
            aliases: &["v"],
            usage: "select default|latest|N",
            help: "View a version",
        },
        CommandDef {
            name: "default",
            aliases: &[],
            usage: "default N",
            help: "Make version N the default",
        },
        CommandDef {
            name: "hide",
            aliases: &[],
            usage: "hide N",
            help: "Hide or unhide version N",
        },
        CommandDef {
            name: "comment",
            aliases: &[],
            usage: "comment N TEXT",
            help: "Set the comment of version N",
        },
        CommandDef {
            name: "hidden",
            aliases: &[],
            usage: "hidden",
            help: "Show or hide hidden versions",
        },
        CommandDef {
            name: "refresh",
            aliases: &["r"],
            usage: "refresh",
            help: "Reload the current view",
        },
        CommandDef {
            name: "edit",
            aliases: &["e"],
            usage: "edit",
            help: "Edit the selected version",
        },
        CommandDef {
            name: "cancel",
            aliases: &[],
            usage: "cancel",
            help: "Discard edits",
        },
        CommandDef {
            name: "save",
            aliases: &["w"],
            usage: "save",
            help: "Upload edits as a new version",
        },
        CommandDef {
            name: "quit",
            aliases: &["q"],
            usage: "quit",
            help: "Exit",
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Command {
    Help,
    Login { user: String, token: String },
    Logout,
    Token(String),
    Open(String),
    Crumb(usize),
    Back,
    Forward,
    Select(VersionToken),
    MakeDefault(u64),
    ToggleHidden(u64),
    Comment(u64, String),
    ShowHidden,
    Refresh,
    Edit,
    Cancel,
    Save,
    Quit,
}

pub(super) fn parse_command(line: &str) -> Result<Command> {
    let words = tokenize(line.trim_start_matches(':'))?;
    let Some((head, args)) = words.split_first() else {
        anyhow::bail!("empty command");
    };
    let def = command_defs()
        .into_iter()
        .find(|d| d.name == head || d.aliases.contains(&head.as_str()))
        .with_context(|| format!("unknown command: {}", head))?;

    let arity = |n: usize| -> Result<()> {
        if args.len() != n {
            anyhow::bail!("usage: {}", def.usage);
        }
        Ok(())
    };
    let version = |s: &str| -> Result<u64> {
        s.parse::<u64>()
            .with_context(|| format!("not a version number: {}", s))
    };

    let cmd = match def.name {
        "help" => Command::Help,
        "login" => {
            arity(2)?;
            Command::Login {
                user: args[0].clone(),
                token: args[1].clone(),
            }
        }
        "logout" => Command::Logout,
        "token" => {
            arity(1)?;
            Command::Token(args[0].clone())
        }
        "open" => {
            if args.is_empty() {
                anyhow::bail!("usage: {}", def.usage);
            }
            Command::Open(args.join(" "))
        }
        "crumb" => {
            arity(1)?;
            Command::Crumb(
                args[0]
                    .parse()
                    .with_context(|| format!("not a crumb index: {}", args[0]))?,
            )
        }
        "back" => Command::Back,
        "forward" => Command::Forward,
        "select" => {
            arity(1)?;
            Command::Select(args[0].parse()?)
        }
        "default" => {
            arity(1)?;
            Command::MakeDefault(version(&args[0])?)
        }
        "hide" => {
            arity(1)?;
            Command::ToggleHidden(version(&args[0])?)
        }
        "comment" => {
            if args.is_empty() {
                anyhow::bail!("usage: {}", def.usage);
            }
            Command::Comment(version(&args[0])?, args[1..].join(" "))
        }
        "hidden" => Command::ShowHidden,
        "refresh" => Command::Refresh,
        "edit" => Command::Edit,
        "cancel" => Command::Cancel,
        "save" => Command::Save,
        "quit" => Command::Quit,
        other => anyhow::bail!("unhandled command: {}", other),
    };
    Ok(cmd)
}

/// Names matching the word being typed, best first.
pub(super) fn suggestions(input: &str) -> Vec<CommandDef> {
    let q = input.trim_start_matches(':').trim_start();
    if q.is_empty() || q.contains(char::is_whitespace) {
        return Vec::new();
    }
    let mut scored: Vec<(i32, CommandDef)> = command_defs()
        .into_iter()
        .filter_map(|d| {
            let best = std::iter::once(d.name)
                .chain(d.aliases.iter().copied())
                .map(|c| score_match(q, c))
                .max()
                .unwrap_or(0);
            (best > 0).then_some((best, d))
        })
        .collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.name.cmp(b.name)));
    scored.into_iter().map(|(_, d)| d).collect()
}

fn score_match(q: &str, candidate: &str) -> i32 {
    let q = q.to_lowercase();
    let c = candidate.to_lowercase();
    if c == q {
        return 100;
    }
    if c.starts_with(&q) {
        return 50 - (c.len() as i32 - q.len() as i32);
    }
    0
}

fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in input.chars() {
        if escape {
            cur.push(ch);
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !cur.is_empty() {
                    out.push(std::mem::take(&mut cur));
                }
            }
            c => cur.push(c),
        }
    }

    if escape {
        anyhow::bail!("dangling escape");
    }
    if in_quotes {
        anyhow::bail!("unterminated quote");
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/tui_shell/commands_tests.rs"]
mod tests;
