//! Handing a chosen secret to `pass`.
//!
//! Decryption always happens in the external program; this module only
//! decides how it is invoked and where its output goes.

use crate::clipboard;
use crate::navigator::SecretReference;
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::process::{Command, Stdio};
use std::time::Duration;

/// Something that can put the secret behind a reference on the clipboard.
pub trait SecretExtractor {
    fn extract(&self, reference: &SecretReference) -> Result<()>;
}

/// `pass -c <reference>`: `pass` decrypts, copies and clears on its own.
#[derive(Debug, Clone)]
pub struct PassClip {
    program: OsString,
}

impl PassClip {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SecretExtractor for PassClip {
    fn extract(&self, reference: &SecretReference) -> Result<()> {
        log::info!("running {:?} -c {}", self.program, reference);
        let status = Command::new(&self.program)
            .arg("-c")
            .arg(reference)
            .stdout(Stdio::null())
            .status()
            .with_context(|| format!("failed to run {:?}", self.program))?;

        if !status.success() {
            bail!("{:?} -c {} exited with {}", self.program, reference, status);
        }
        Ok(())
    }
}

/// `pass show <reference>`, first line copied by our own clipboard owner.
#[derive(Debug, Clone)]
pub struct PassShowClipboard {
    program: OsString,
    clear_after: Duration,
}

impl PassShowClipboard {
    pub fn new(program: impl Into<OsString>, clear_after: Duration) -> Self {
        Self {
            program: program.into(),
            clear_after,
        }
    }

    fn show(&self, reference: &SecretReference) -> Result<String> {
        log::info!("running {:?} show {}", self.program, reference);
        let output = Command::new(&self.program)
            .arg("show")
            .arg(reference)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("failed to run {:?}", self.program))?;

        if !output.status.success() {
            bail!(
                "{:?} show {} exited with {}",
                self.program,
                reference,
                output.status
            );
        }
        let text = String::from_utf8(output.stdout)
            .with_context(|| format!("secret {} is not valid UTF-8", reference))?;
        Ok(text)
    }
}

impl SecretExtractor for PassShowClipboard {
    fn extract(&self, reference: &SecretReference) -> Result<()> {
        let decrypted = self.show(reference)?;
        let Some(password) = first_line(&decrypted) else {
            bail!("secret {} is empty", reference);
        };
        clipboard::copy_text_to_clipboard(password.to_string(), self.clear_after)
            .with_context(|| format!("failed to copy {} to the clipboard", reference))
    }
}

/// The password part of a `pass` entry: its first line, without the newline.
fn first_line(decrypted: &str) -> Option<&str> {
    decrypted
        .lines()
        .next()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
}
