//! Options parser.

use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Default)]
pub struct Options {
    pub help: bool,
    pub version: bool,
    pub tab_size: Option<usize>,
    pub log_file: Option<String>,
    pub ops: bool,
    pub bindings: bool,
    pub config_path: Option<String>,
    pub files: Vec<String>,
}

impl Options {
    pub fn parse<T>(args: T) -> Result<Options>
    where
        T: IntoIterator<Item = String>,
    {
        let mut opts = Options::default();
        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--help" => opts.help = true,
                "--version" => opts.version = true,
                "--tab-size" => {
                    let tab_size = parse_arg::<usize>(&arg, it.next())?;
                    if tab_size == 0 {
                        return Err(Error::invalid_value(&arg, "0"));
                    }
                    opts.tab_size = Some(tab_size);
                }
                "--log" => opts.log_file = Some(expect_value(&arg, it.next())?),
                "--ops" => opts.ops = true,
                "--bindings" => opts.bindings = true,
                "--config" => opts.config_path = Some(expect_value(&arg, it.next())?),
                arg if arg.starts_with("--") => return Err(Error::unexpected_arg(arg)),
                _ => opts.files.push(arg),
            }
        }
        Ok(opts)
    }
}

fn parse_arg<T>(arg: &str, next_arg: Option<String>) -> Result<T>
where
    T: FromStr,
{
    if let Some(value) = next_arg {
        value
            .parse::<T>()
            .map_err(|_| Error::invalid_value(arg, &value))
    } else {
        Err(Error::expected_value(arg))
    }
}

fn expect_value(arg: &str, next_arg: Option<String>) -> Result<String> {
    next_arg.ok_or_else(|| Error::expected_value(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        Options::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn files_and_flags() {
        let opts = parse(&["--ops", "a.txt", "--config", "rc", "b.txt"]).unwrap();
        assert!(opts.ops);
        assert!(!opts.help);
        assert_eq!(opts.config_path.as_deref(), Some("rc"));
        assert_eq!(opts.files, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn tab_size_must_be_positive_number() {
        assert_eq!(parse(&["--tab-size", "4"]).unwrap().tab_size, Some(4));
        assert!(matches!(
            parse(&["--tab-size", "x"]),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--tab-size", "0"]),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--tab-size"]),
            Err(Error::ExpectedValue { .. })
        ));
    }

    #[test]
    fn unknown_option() {
        assert!(matches!(
            parse(&["--frobnicate"]),
            Err(Error::UnexpectedArg { .. })
        ));
    }
}
