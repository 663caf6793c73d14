use crate::cli::CopyWith;
use crate::config::AppConfig;
use crate::extractor::{PassClip, PassShowClipboard, SecretExtractor};
use crate::navigator::StoreNavigator;
use crate::tui::{self, SessionOutcome};
use anyhow::Result;
use std::io::{self, Write};

fn build_extractor(config: &AppConfig) -> Box<dyn SecretExtractor> {
    match config.copy_with {
        CopyWith::Pass => Box::new(PassClip::new(&config.pass_bin)),
        CopyWith::Clipboard => Box::new(PassShowClipboard::new(&config.pass_bin, config.clip_time)),
    }
}

// Headless mode: one store-relative secret path per line, like `pass ls` without the tree.
fn write_secret_list(navigator: &StoreNavigator, out: &mut impl Write) -> Result<()> {
    for secret in navigator.all_secrets()? {
        writeln!(out, "{}", secret)?;
    }
    Ok(())
}

// Performs the final action once the terminal is back: print the path or hand it to the extractor.
fn finish_session(
    outcome: SessionOutcome,
    extractor: &dyn SecretExtractor,
    print_only: bool,
    out: &mut impl Write,
) -> Result<()> {
    match outcome {
        SessionOutcome::Cancelled => {
            log::info!("session cancelled");
        }
        SessionOutcome::Chosen(reference) if print_only => {
            writeln!(out, "{}", reference)?;
        }
        SessionOutcome::Chosen(reference) => {
            extractor.extract(&reference)?;
            writeln!(out, "✅ Copied {} to the clipboard.", reference)?;
        }
    }
    Ok(())
}

// Main orchestrator: open the store, browse it, act on the choice.
pub fn run_pass_prompt(config: AppConfig) -> Result<()> {
    let navigator = StoreNavigator::open(&config.store_root, config.list_options)?;
    log::info!("using store {}", navigator.root().display());
    let mut stdout = io::stdout();

    if config.list_only {
        return write_secret_list(&navigator, &mut stdout);
    }

    let outcome = tui::run_tui(navigator)?;
    let extractor = build_extractor(&config);
    finish_session(outcome, extractor.as_ref(), config.print_only, &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::tests::RecordingExtractor;
    use crate::navigator::ListOptions;
    use std::fs;
    use tempfile::TempDir;

    fn chosen(path: &str) -> SessionOutcome {
        let tmp = TempDir::new().unwrap();
        let full = tmp.path().join(format!("{}.gpg", path));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, b"x").unwrap();

        let mut nav = StoreNavigator::open(tmp.path(), ListOptions::default()).unwrap();
        let mut parts: Vec<&str> = path.split('/').collect();
        let leaf = parts.pop().unwrap();
        for dir in parts {
            assert!(nav.move_to(dir));
        }
        let index = nav
            .list()
            .iter()
            .find(|e| e.name() == leaf)
            .unwrap()
            .index();
        SessionOutcome::Chosen(nav.resolve_secret(index).unwrap().unwrap())
    }

    #[test]
    fn chosen_secret_goes_to_extractor() {
        let fake = RecordingExtractor::default();
        let mut out = Vec::new();
        finish_session(chosen("Social/twitter"), &fake, false, &mut out).unwrap();

        assert_eq!(*fake.seen.borrow(), vec!["Social/twitter".to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "✅ Copied Social/twitter to the clipboard.\n"
        );
    }

    #[test]
    fn print_only_skips_extractor() {
        let fake = RecordingExtractor::default();
        let mut out = Vec::new();
        finish_session(chosen("bank"), &fake, true, &mut out).unwrap();

        assert!(fake.seen.borrow().is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "bank\n");
    }

    #[test]
    fn cancelled_session_does_nothing() {
        let fake = RecordingExtractor::default();
        let mut out = Vec::new();
        finish_session(SessionOutcome::Cancelled, &fake, false, &mut out).unwrap();

        assert!(fake.seen.borrow().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn extractor_failure_propagates() {
        let fake = RecordingExtractor {
            fail: true,
            ..RecordingExtractor::default()
        };
        let mut out = Vec::new();
        let err = finish_session(chosen("bank"), &fake, false, &mut out).unwrap_err();

        assert!(err.to_string().contains("bank"));
        assert!(out.is_empty());
    }

    #[test]
    fn secret_list_prints_every_reference() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Social")).unwrap();
        fs::write(tmp.path().join("Social/twitter.gpg"), b"x").unwrap();
        fs::write(tmp.path().join("bank.gpg"), b"x").unwrap();
        let nav = StoreNavigator::open(tmp.path(), ListOptions::default()).unwrap();

        let mut out = Vec::new();
        write_secret_list(&nav, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Social/twitter\nbank\n");
    }

    #[test]
    fn invalid_store_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig {
            store_root: tmp.path().join("missing"),
            list_options: ListOptions::default(),
            copy_with: CopyWith::Pass,
            pass_bin: "pass".into(),
            clip_time: std::time::Duration::from_secs(45),
            print_only: false,
            list_only: true,
        };
        let err = run_pass_prompt(config).unwrap_err();
        assert!(err.to_string().starts_with("invalid pass directory"));
    }
}
