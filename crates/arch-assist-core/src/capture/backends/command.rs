//! Capture by running an external screenshot tool that writes an image to stdout

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::debug;

use crate::capture::backend::{CaptureBackend, HostReply};
use crate::capture::host_image::{EncodedImage, SharedImage};
use crate::utils::find_program;

/// A screenshot command such as `grim -` or `screencapture -x -t png /dev/stdout`
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    /// Build from an argv; `None` if the argv is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl CaptureBackend for CommandBackend {
    fn name(&self) -> &'static str {
        "screenshot-command"
    }

    fn is_present(&self) -> bool {
        find_program(&self.program).is_some()
    }

    fn capture(&self) -> anyhow::Result<HostReply> {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);
        let program = self.program.clone();

        Ok(HostReply::pending(async move {
            let output = command
                .output()
                .await
                .with_context(|| format!("failed to run {}", program))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!("{} exited with {}: {}", program, output.status, stderr.trim());
            }
            if output.stdout.is_empty() {
                debug!("{} wrote nothing to stdout", program);
                return Ok(None);
            }

            let image: SharedImage = Arc::new(EncodedImage::new(output.stdout, program));
            Ok(Some(image))
        }))
    }
}
