use anyhow::{Context, Result, anyhow};
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;
use std::time::Duration;

pub const DAEMON_FLAG: &str = "__clipboard_daemon";

/// Seconds a copied secret stays on the clipboard unless
/// `PASSWORD_STORE_CLIP_TIME` says otherwise (same default as `pass`).
pub const DEFAULT_CLIP_SECONDS: u64 = 45;

/// On X11/Wayland the selection lives only as long as its owner, so the
/// daemon owns it until the clip time runs out and then exits, which clears it.
#[cfg(target_os = "linux")]
fn run_daemon_mode(clear_after: Duration) -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;

    let mut clipboard = Clipboard::new()?;
    clipboard
        .set()
        .wait_until(std::time::Instant::now() + clear_after)
        .text(text)
        .map_err(anyhow::Error::from)
}

fn daemon_clear_after(args: &[String]) -> Option<Duration> {
    let pos = args.iter().position(|a| a == DAEMON_FLAG)?;
    let seconds = args
        .get(pos + 1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CLIP_SECONDS);
    Some(Duration::from_secs(seconds))
}

/// Checks if the DAEMON_FLAG is present in args. If so, runs in daemon mode and exits.
/// Returns Ok(true) if daemon mode was run (and exited), Ok(false) otherwise.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    let args: Vec<String> = std::env::args().collect();
    if let Some(clear_after) = daemon_clear_after(&args) {
        #[cfg(target_os = "linux")]
        {
            run_daemon_mode(clear_after)?;
            return Ok(true);
        }
        #[cfg(not(target_os = "linux"))]
        {
            log::warn!(
                "{} flag used on non-Linux system, ignoring ({}s)",
                DAEMON_FLAG,
                clear_after.as_secs()
            );
            std::process::exit(0);
        }
    }
    Ok(false)
}

/// Clip time from `PASSWORD_STORE_CLIP_TIME`, falling back to the default.
pub fn clip_time_from(value: Option<&str>) -> Duration {
    let seconds = value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_CLIP_SECONDS);
    Duration::from_secs(seconds)
}

pub fn copy_text_to_clipboard(text: String, clear_after: Duration) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
        clipboard.set_text(text)?;
        log::debug!(
            "copied to clipboard; clearing after {}s is left to the platform",
            clear_after.as_secs()
        );
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        // A detached owner process keeps the selection alive after we exit.
        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .arg(clear_after.as_secs().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("failed to start clipboard owner process")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
            stdin.flush()?;
        } else {
            return Err(anyhow!("Failed to get stdin for clipboard daemon"));
        }
        log::debug!(
            "clipboard owner {} started, clearing after {}s",
            child.id(),
            clear_after.as_secs()
        );
    }
    Ok(())
}
