//! Command line arguments shared by the checkers.

use clap::{Args, CommandFactory, Parser};
use std::{ffi::OsString, fmt::Display, process};
use url::Url;

/// Endpoint used when neither `--rpc` nor `CELO_RPC_URL` is set.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545/";

/// Node connection arguments.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RpcArgs {
    /// RPC endpoint for the celo node
    #[arg(long = "rpc", value_name = "URL", env = "CELO_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub url: Url,
}

/// Rewrites single-dash long flags (`-activationblock=5`) into their
/// double-dash form so scripts written for the Go tooling keep working.
///
/// Short flags (`-h`), negative numbers and everything after `--` are left
/// alone. The first item is the program name and is never touched.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.by_ref().take(1).collect();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            normalized.push(arg);
            continue
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue
        }

        let is_legacy = text.strip_prefix('-').is_some_and(|rest| {
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            name.len() > 1 && name.starts_with(|c: char| c.is_ascii_alphabetic())
        });
        normalized.push(if is_legacy { format!("-{text}").into() } else { arg });
    }

    normalized
}

/// Parses the process arguments into `T`.
///
/// Prints help or version and exits with 0 when asked to. On a parse error
/// prints the error and exits with 1.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse_from(normalize_legacy_flags(std::env::args_os())) {
        Ok(args) => args,
        Err(err) => {
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            process::exit(code)
        }
    }
}

/// Reports an invalid option followed by the usage of `T`, then exits with 1.
pub fn exit_with_usage<T: CommandFactory>(err: impl Display) -> ! {
    println!("{err}");
    eprintln!("{}", T::command().render_help());
    process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        rpc: RpcArgs,

        #[arg(long = "activationblock")]
        activation_block: Option<u64>,
    }

    fn normalized(args: &[&str]) -> Vec<String> {
        normalize_legacy_flags(args.iter().copied())
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_normalize_single_dash_flags() {
        assert_eq!(
            normalized(&["cip21-check", "-activationblock", "250", "-value-before=5"]),
            vec!["cip21-check", "--activationblock", "250", "--value-before=5"]
        );
    }

    #[test]
    fn test_normalize_keeps_other_args() {
        assert_eq!(
            normalized(&["-program", "--rpc", "http://node", "-h", "-5", "--", "-epoch"]),
            vec!["-program", "--rpc", "http://node", "-h", "-5", "--", "-epoch"]
        );
    }

    #[test]
    fn test_parse_legacy_flags() {
        let cli = TestCli::try_parse_from(normalize_legacy_flags([
            "cip21-check",
            "-rpc",
            "http://10.0.0.1:8545",
            "-activationblock",
            "250",
        ]))
        .unwrap();
        assert_eq!(cli.rpc.url.as_str(), "http://10.0.0.1:8545/");
        assert_eq!(cli.activation_block, Some(250));
    }

    #[test]
    fn test_invalid_rpc_url() {
        assert!(TestCli::try_parse_from(["cip21-check", "--rpc", "not a url"]).is_err());
    }

    #[test]
    fn test_usage_lists_flags() {
        let help = TestCli::command().render_help().to_string();
        assert!(help.contains("--rpc"));
        assert!(help.contains("--activationblock"));
    }
}
