//! Container image contract for the bot.
//!
//! The repository's `Dockerfile` is rendered from [`ImageContract`]; [`ImageContract::check`]
//! verifies any Dockerfile against the same contract.

pub mod dockerfile;

pub use dockerfile::{CopyInstruction, DeclaredImage};

use crate::utils::error::{BotError, Result};
use std::collections::BTreeSet;

pub const BUILDER_IMAGE: &str = "rust:1.82-slim-bookworm";
pub const RUNTIME_IMAGE: &str = "debian:bookworm-slim";
pub const WORKDIR: &str = "/app";
pub const MANIFEST: &str = "Cargo.toml";
pub const BINARY: &str = "prayer-times-bot";
pub const EXPOSED_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContract {
    pub builder_image: String,
    pub runtime_image: String,
    pub workdir: String,
    pub manifest: String,
    pub binary: String,
    pub exposed_port: u16,
}

impl Default for ImageContract {
    fn default() -> Self {
        Self {
            builder_image: BUILDER_IMAGE.to_string(),
            runtime_image: RUNTIME_IMAGE.to_string(),
            workdir: WORKDIR.to_string(),
            manifest: MANIFEST.to_string(),
            binary: BINARY.to_string(),
            exposed_port: EXPOSED_PORT,
        }
    }
}

impl ImageContract {
    pub fn exposed_ports(&self) -> BTreeSet<String> {
        BTreeSet::from([format!("{}/tcp", self.exposed_port)])
    }

    pub fn entrypoint(&self) -> Vec<String> {
        vec![self.binary.clone()]
    }

    pub fn render(&self) -> String {
        let bin = &self.binary;
        let lines = [
            "# Build stage: compile against a pinned toolchain. The registry cache and".to_string(),
            format!("# target/ are removed in the same layer; a missing {} fails here.", self.manifest),
            format!("FROM {} AS builder", self.builder_image),
            format!("WORKDIR {}", self.workdir),
            "COPY . .".to_string(),
            format!("RUN cargo build --release --bin {} \\", bin),
            format!("    && install -m 0755 target/release/{bin} /usr/local/bin/{bin} \\"),
            "    && rm -rf target \"$CARGO_HOME/registry\" \"$CARGO_HOME/git\"".to_string(),
            String::new(),
            "# Runtime stage".to_string(),
            format!("FROM {}", self.runtime_image),
            format!("WORKDIR {}", self.workdir),
            "RUN apt-get update \\".to_string(),
            "    && apt-get install -y --no-install-recommends ca-certificates \\".to_string(),
            "    && rm -rf /var/lib/apt/lists/*".to_string(),
            "COPY . .".to_string(),
            format!("COPY --from=builder /usr/local/bin/{bin} /usr/local/bin/{bin}"),
            String::new(),
            "# Keep-alive server".to_string(),
            format!("EXPOSE {}", self.exposed_port),
            String::new(),
            "# Run the bot".to_string(),
            format!("CMD [\"{}\"]", bin),
        ];

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Checks the final stage: context copied into the workdir, exactly one exposed
    /// port, and the bare binary as the default command.
    pub fn check(&self, image: &DeclaredImage) -> Result<()> {
        let mut problems = Vec::new();

        if image.workdir.as_deref() != Some(self.workdir.as_str()) {
            problems.push(format!(
                "WORKDIR is {:?}, expected {}",
                image.workdir, self.workdir
            ));
        }

        if image.exposed_ports != self.exposed_ports() {
            problems.push(format!(
                "exposed ports are {:?}, expected {:?}",
                image.exposed_ports,
                self.exposed_ports()
            ));
        }

        if image.cmd.as_ref() != Some(&self.entrypoint()) {
            problems.push(format!(
                "CMD is {:?}, expected {:?}",
                image.cmd,
                self.entrypoint()
            ));
        }

        if !image.copies.iter().any(|copy| self.copies_context(copy)) {
            problems.push(format!("build context is not copied into {}", self.workdir));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(BotError::ImageContractError {
                message: problems.join("; "),
            })
        }
    }

    fn copies_context(&self, copy: &CopyInstruction) -> bool {
        let dest = copy.destination.trim_end_matches('/');
        copy.from.is_none()
            && copy.sources == ["."]
            && (dest == "." || dest.is_empty() || dest == self.workdir.trim_end_matches('/'))
    }
}
