use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the chosen secret reaches the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyWith {
    /// `pass -c`, pass clears the clipboard itself
    Pass,
    /// `pass show` piped into pass-prompt's own clipboard owner
    Clipboard,
}

/// pass-prompt – browse a password store and copy a secret to the clipboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Password store root (defaults to ~/.password-store)
    #[arg(value_name = "STORE_DIR", env = "PASSWORD_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// List entries in filesystem enumeration order instead of by name
    #[arg(long)]
    pub fs_order: bool,

    /// Hide names starting with a dot (.git, .gpg-id, ...)
    #[arg(long)]
    pub hide_dotfiles: bool,

    /// Mechanism used to copy the chosen secret
    #[arg(long, value_enum, default_value_t = CopyWith::Pass)]
    pub copy_with: CopyWith,

    /// The pass executable to invoke
    #[arg(long, value_name = "PROGRAM", default_value = "pass")]
    pub pass_bin: PathBuf,

    /// Print the chosen secret's store path instead of copying it
    #[arg(long)]
    pub print: bool,

    /// Print every secret in the store and exit without the TUI
    #[arg(long, conflicts_with = "print")]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["pass-prompt", "/tmp/store"]).unwrap();
        assert_eq!(cli.store_dir, Some(PathBuf::from("/tmp/store")));
        assert_eq!(cli.copy_with, CopyWith::Pass);
        assert_eq!(cli.pass_bin, PathBuf::from("pass"));
        assert!(!cli.fs_order && !cli.hide_dotfiles && !cli.print && !cli.list);
    }

    #[test]
    fn all_flags() {
        let cli = Cli::try_parse_from([
            "pass-prompt",
            "--fs-order",
            "--hide-dotfiles",
            "--copy-with",
            "clipboard",
            "--pass-bin",
            "/usr/local/bin/pass",
            "--print",
            "store",
        ])
        .unwrap();
        assert!(cli.fs_order && cli.hide_dotfiles && cli.print);
        assert_eq!(cli.copy_with, CopyWith::Clipboard);
        assert_eq!(cli.pass_bin, PathBuf::from("/usr/local/bin/pass"));
    }

    #[test]
    fn list_conflicts_with_print() {
        assert!(Cli::try_parse_from(["pass-prompt", "x", "--list", "--print"]).is_err());
    }
}
