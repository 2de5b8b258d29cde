use crate::utils::error::{BotError, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyInstruction {
    /// Stage or image named by `--from`, if any.
    pub from: Option<String>,
    pub sources: Vec<String>,
    pub destination: String,
}

/// What the final stage of a Dockerfile declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredImage {
    pub base: String,
    pub workdir: Option<String>,
    /// Normalised to `port/proto`.
    pub exposed_ports: BTreeSet<String>,
    pub cmd: Option<Vec<String>>,
    pub copies: Vec<CopyInstruction>,
}

impl DeclaredImage {
    pub fn parse(text: &str) -> Result<Self> {
        let mut stage: Option<DeclaredImage> = None;

        for (line_no, instruction) in logical_lines(text) {
            let (keyword, args) = match instruction.split_once(char::is_whitespace) {
                Some((keyword, args)) => (keyword.to_ascii_uppercase(), args.trim()),
                None => (instruction.to_ascii_uppercase(), ""),
            };

            if keyword == "FROM" {
                let base = args.split_whitespace().next().unwrap_or_default();
                if base.is_empty() {
                    return Err(parse_error(line_no, "FROM without an image"));
                }
                stage = Some(DeclaredImage {
                    base: base.to_string(),
                    ..Default::default()
                });
                continue;
            }

            let current = stage
                .as_mut()
                .ok_or_else(|| parse_error(line_no, "instruction before the first FROM"))?;

            match keyword.as_str() {
                "WORKDIR" => {
                    current.workdir = Some(resolve_workdir(current.workdir.as_deref(), args));
                }
                "EXPOSE" => {
                    for port in args.split_whitespace() {
                        current.exposed_ports.insert(normalise_port(port, line_no)?);
                    }
                }
                "CMD" => current.cmd = Some(parse_command(args, line_no)?),
                "COPY" | "ADD" => current.copies.push(parse_copy(args, line_no)?),
                _ => {}
            }
        }

        stage.ok_or_else(|| BotError::ImageContractError {
            message: "Dockerfile has no FROM instruction".to_string(),
        })
    }
}

fn parse_error(line_no: usize, message: &str) -> BotError {
    BotError::ImageContractError {
        message: format!("line {}: {}", line_no, message),
    }
}

/// Joins `\` continuations and drops comments and blank lines.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut buffer = String::new();
    let mut start = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if buffer.is_empty() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            start = idx + 1;
        } else if line.starts_with('#') {
            continue;
        }

        match line.strip_suffix('\\') {
            Some(head) => {
                buffer.push_str(head.trim_end());
                buffer.push(' ');
            }
            None => {
                buffer.push_str(line);
                lines.push((start, std::mem::take(&mut buffer).trim().to_string()));
            }
        }
    }

    if !buffer.trim().is_empty() {
        lines.push((start, buffer.trim().to_string()));
    }
    lines
}

fn resolve_workdir(current: Option<&str>, path: &str) -> String {
    let path = path.trim().trim_matches('"');
    if path.starts_with('/') {
        let trimmed = path.trim_end_matches('/');
        return if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
    }
    let base = current.unwrap_or("/").trim_end_matches('/');
    format!("{}/{}", base, path.trim_end_matches('/'))
}

fn normalise_port(port: &str, line_no: usize) -> Result<String> {
    let (number, proto) = port.split_once('/').unwrap_or((port, "tcp"));
    let number: u16 = number
        .parse()
        .map_err(|_| parse_error(line_no, &format!("invalid port {}", port)))?;
    let proto = proto.to_ascii_lowercase();
    if proto != "tcp" && proto != "udp" {
        return Err(parse_error(line_no, &format!("invalid protocol {}", proto)));
    }
    Ok(format!("{}/{}", number, proto))
}

fn parse_command(args: &str, line_no: usize) -> Result<Vec<String>> {
    if args.starts_with('[') {
        return serde_json::from_str(args)
            .map_err(|e| parse_error(line_no, &format!("invalid exec-form CMD: {}", e)));
    }
    Ok(vec!["/bin/sh".to_string(), "-c".to_string(), args.to_string()])
}

fn parse_copy(args: &str, line_no: usize) -> Result<CopyInstruction> {
    let mut from = None;
    let mut paths = Vec::new();

    for token in args.split_whitespace() {
        if let Some(flag) = token.strip_prefix("--") {
            if let Some(stage) = flag.strip_prefix("from=") {
                from = Some(stage.to_string());
            }
            continue;
        }
        paths.push(token.to_string());
    }

    let destination = paths
        .pop()
        .ok_or_else(|| parse_error(line_no, "COPY without destination"))?;
    if paths.is_empty() {
        return Err(parse_error(line_no, "COPY without source"));
    }

    Ok(CopyInstruction {
        from,
        sources: paths,
        destination,
    })
}
