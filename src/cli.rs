use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case", version, about)]
pub struct Opts {
    /// Routes to forward to, as URIs such as `fluentd-tcp://fluentd:24224?format=forward`.
    /// Appended after the routes read from `--config`.
    #[arg(env = "FORWARDER_ROUTES", value_delimiter = ',')]
    pub routes: Vec<String>,

    /// Read routes from a TOML configuration file.
    #[arg(short, long, env = "FORWARDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of threads to use for processing (default is number of available cores)
    #[arg(short, long, env = "FORWARDER_THREADS")]
    pub threads: Option<usize>,

    /// Enable more detailed internal logging. Repeat to increase level. Overridden by `--quiet`.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce detail of internal logging. Repeat to reduce further. Overrides `--verbose`.
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Set the logging format
    #[arg(long, default_value = "text", env = "FORWARDER_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Control when ANSI terminal formatting is used.
    ///
    /// By default the forwarder detects whether stderr is a terminal and enables ANSI only then.
    #[arg(long, default_value = "auto", env = "FORWARDER_COLOR")]
    pub color: Color,
}

impl Opts {
    pub fn get_matches() -> Self {
        Self::parse()
    }

    pub const fn log_level(&self) -> &'static str {
        match self.quiet {
            0 => match self.verbose {
                0 => "info",
                1 => "debug",
                2..=255 => "trace",
            },
            1 => "warn",
            2 => "error",
            3..=255 => "off",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    pub fn use_color(self) -> bool {
        match self {
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opts {
        Opts::try_parse_from(std::iter::once("fluentd-forwarder").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn parses_routes_and_flags() {
        let opts = parse(&[
            "fluentd-tcp://a:24224",
            "fluentd-tcp://b:24224",
            "--config",
            "/etc/forwarder.toml",
            "--log-format",
            "json",
            "--color",
            "never",
        ]);

        assert_eq!(opts.routes, vec!["fluentd-tcp://a:24224", "fluentd-tcp://b:24224"]);
        assert_eq!(opts.config, Some(PathBuf::from("/etc/forwarder.toml")));
        assert_eq!(opts.log_format, LogFormat::Json);
        assert!(!opts.color.use_color());
    }

    #[test]
    fn maps_verbosity_to_level() {
        assert_eq!(parse(&[]).log_level(), "info");
        assert_eq!(parse(&["-v"]).log_level(), "debug");
        assert_eq!(parse(&["-vv"]).log_level(), "trace");
        assert_eq!(parse(&["-q"]).log_level(), "warn");
        assert_eq!(parse(&["-v", "-qq"]).log_level(), "error");
        assert_eq!(parse(&["-qqq"]).log_level(), "off");
    }
}
