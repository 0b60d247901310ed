use clap::{App, Arg};
use log::debug;
use std::fs;
use std::iter::ExactSizeIterator;
use std::path::{Path, PathBuf};

use super::{compile, CompilerError};

pub const SOURCE_EXTENSION: &str = "neto";
pub const IR_EXTENSION: &str = "ir";

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    verbose: bool,
    write_ir: bool,
    output: Option<PathBuf>,
    input: PathBuf,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            write_ir: true,
            output: None,
            input: PathBuf::new(),
        }
    }
}

impl CompilerOptions {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The file the intermediate code is written to, if any.
    pub fn output(&self) -> Option<PathBuf> {
        if !self.write_ir {
            return None;
        }

        match self.output {
            Some(ref output) => Some(output.clone()),
            None => Some(self.input.with_extension(IR_EXTENSION)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Command {}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the input file and returns the report to print.
    pub fn run(&self, options: &CompilerOptions) -> Result<String, CompilerError> {
        let input = options.input();

        if input.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
            return Err(CompilerError::InvalidExtension(input.to_path_buf()));
        }

        let src = fs::read_to_string(input)?;
        let compilation = compile(&src)?;
        let listing = compilation.listing();

        if let Some(output) = options.output() {
            fs::write(&output, &listing).map_err(CompilerError::OutputError)?;
            debug!("[ir] written to {}", output.display());
        }

        Ok(format!("ACCEPTED\n{}", listing))
    }
}

pub fn parse_options(
    args: impl ExactSizeIterator<Item = String>,
) -> Result<CompilerOptions, CompilerError> {
    let matches = App::new("neto")
        .about("Compiles a neto program into three-address code")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Logs the tokens, syntax tree, function table and intermediate code"),
        )
        .arg(
            Arg::with_name("no-ir")
                .long("no-ir")
                .help("Doesn't write the intermediate code file"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("PATH")
                .conflicts_with("no-ir")
                .help("Sets the intermediate code file [default: <INPUT>.ir]"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .get_matches_from(args);

    let mut options = CompilerOptions::new(matches.value_of("INPUT").unwrap_or_default());

    options.verbose = matches.is_present("verbose");
    options.write_ir = !matches.is_present("no-ir");

    if let Some(output) = matches.value_of("output") {
        let output = PathBuf::from(output);

        if output == options.input {
            return Err(format!("output file `{}` is the input file", output.display()).into());
        }
        options.output = Some(output);
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn options(args: &[&str]) -> Result<CompilerOptions, CompilerError> {
        let args = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
        parse_options(args.into_iter())
    }

    #[test]
    fn defaults() {
        let options = options(&["neto", "dir/prog.neto"]).unwrap();

        assert!(!options.verbose());
        assert_eq!(options.input(), Path::new("dir/prog.neto"));
        assert_eq!(options.output(), Some(PathBuf::from("dir/prog.ir")));
    }

    #[test]
    fn flags() {
        let options = options(&["neto", "-v", "--no-ir", "prog.neto"]).unwrap();

        assert!(options.verbose());
        assert_eq!(options.output(), None);
    }

    #[test]
    fn output() {
        let options = options(&["neto", "-o", "out.txt", "prog.neto"]).unwrap();

        assert_eq!(options.output(), Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn output_is_input() {
        assert_matches!(
            options(&["neto", "--output", "prog.neto", "prog.neto"]),
            Err(CompilerError::InvalidOption(_))
        );
    }

    #[test]
    fn invalid_extension() {
        let command = Command::new();

        assert_matches!(
            command.run(&CompilerOptions::new("prog.txt")),
            Err(CompilerError::InvalidExtension(path)) => {
                assert_eq!(path, PathBuf::from("prog.txt"));
            }
        );
        assert_matches!(
            command.run(&CompilerOptions::new("prog")),
            Err(CompilerError::InvalidExtension(_))
        );
    }

    #[test]
    fn missing_input() {
        let command = Command::new();

        assert_matches!(
            command.run(&CompilerOptions::new("no/such/file.neto")),
            Err(CompilerError::InputSourceError(_))
        );
    }
}
