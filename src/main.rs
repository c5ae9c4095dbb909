use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::fs::{read_to_string, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use polarplot::interpreter::error::{ExecutionError, RuntimeErrorKind};
use polarplot::render::{
    NormalizingTarget, RenderError, RenderTarget, SvgOptions, SvgTarget, VertexTarget,
};

const DATA_ERROR: u8 = 65;
const IO_ERROR: u8 = 74;

#[derive(Debug, Parser)]
#[clap(name = "polarplot", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: PolarplotCommand,
    /// Log pipeline progress at debug level.
    #[clap(long, short, global = true)]
    pub verbose: bool,
    #[clap(long = "error-format", value_enum, default_value = "pretty", global = true)]
    pub error_format: ErrorFormat,
}

#[derive(Debug, Subcommand)]
pub enum PolarplotCommand {
    Tokenize {
        path: PathBuf,
    },
    Parse {
        path: PathBuf,
    },
    Check {
        path: PathBuf,
    },
    Render {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "vertex")]
        format: OutputFormat,
        /// Write to this file instead of stdout.
        #[clap(long, short)]
        output: Option<PathBuf>,
        /// Canvas size in pixels for SVG output.
        #[clap(long, default_value_t = SvgOptions::default().size)]
        size: u32,
        /// Draw the unit circle guide under SVG output.
        #[clap(long)]
        guide: bool,
        /// Rescale radii into [-1, 1] before writing vertices.
        #[clap(long)]
        normalize: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Vertex,
    Svg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ErrorFormat {
    Debug,
    Basic,
    Pretty,
}

fn main() -> ExitCode {
    polarplot_main().expect("Encountered an error!")
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn polarplot_main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CLArgs::parse();
    init_tracing(args.verbose);

    let path = match args.routine {
        PolarplotCommand::Tokenize { ref path }
        | PolarplotCommand::Parse { ref path }
        | PolarplotCommand::Check { ref path }
        | PolarplotCommand::Render { ref path, .. } => path.clone(),
    };
    let src = match read_to_string(&path) {
        Ok(src) => src,
        Err(error) => {
            eprintln!("Can't read {path:?}: {error}");
            return Ok(ExitCode::from(IO_ERROR));
        }
    };
    let name = path.to_string_lossy();
    let session = Session {
        src: &src,
        name: &name,
        error_format: args.error_format,
    };

    let code = match args.routine {
        PolarplotCommand::Tokenize { .. } => session.tokenize(),
        PolarplotCommand::Parse { .. } => session.parse(),
        PolarplotCommand::Check { .. } => session.check(),
        PolarplotCommand::Render {
            format,
            output,
            size,
            guide,
            normalize,
            ..
        } => {
            let options = SvgOptions { size, guide };
            session.render(&format, output.as_deref(), options, normalize)
        }
    };
    Ok(code)
}

struct Session<'a> {
    src: &'a str,
    name: &'a str,
    error_format: ErrorFormat,
}

impl<'a> Session<'a> {
    fn tokenize(&self) -> ExitCode {
        use polarplot::lexer::formatter::{
            BasicFormatter, DebugFormatter, PrettyFormatter, ToFormatter, TokenFormatter,
        };
        use polarplot::lexer::{Lexer, TokenKind};

        let mut lexer = Lexer::new(self.src);
        let formatter: Box<dyn TokenFormatter + '_> = match self.error_format {
            ErrorFormat::Debug => Box::new(DebugFormatter),
            ErrorFormat::Basic => {
                let basic: BasicFormatter = lexer.create_formatter();
                Box::new(basic)
            }
            ErrorFormat::Pretty => Box::new(PrettyFormatter::new(self.src, self.name)),
        };
        let mut succeeded = true;
        loop {
            match lexer.next_token() {
                Ok(token) => {
                    println!("{}", formatter.format(&token));
                    if matches!(token.kind, TokenKind::Eof) {
                        break;
                    }
                }
                Err(error) => {
                    eprintln!("{}", formatter.format_lexical_error(&error));
                    succeeded = false;
                }
            }
        }
        if succeeded {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(DATA_ERROR)
        }
    }

    fn parse_program(&self) -> Option<polarplot::Program> {
        use polarplot::parser::formatter::{
            DebugFormatter, PrettyFormatter, ProgramFormatter, SExpressionFormatter,
        };

        match polarplot::parse(self.src) {
            Ok(program) => Some(program),
            Err(error) => {
                let message = match self.error_format {
                    ErrorFormat::Debug => DebugFormatter.format_error(&error),
                    ErrorFormat::Basic => SExpressionFormatter.format_error(&error),
                    ErrorFormat::Pretty => {
                        PrettyFormatter::new(self.src, self.name).format_error(&error)
                    }
                };
                eprintln!("{message}");
                None
            }
        }
    }

    fn report_execution_error(&self, error: &ExecutionError) -> ExitCode {
        use polarplot::interpreter::formatter::{
            BasicFormatter, DebugFormatter, PrettyFormatter, RuntimeErrorFormatter,
        };

        let message = match self.error_format {
            ErrorFormat::Debug => DebugFormatter.format_execution_error(error),
            ErrorFormat::Basic => BasicFormatter.format_execution_error(error),
            ErrorFormat::Pretty => {
                PrettyFormatter::new(self.src, self.name).format_execution_error(error)
            }
        };
        eprintln!("{message}");

        let io_failure = match error {
            ExecutionError::Close(RenderError::Io(_)) => true,
            ExecutionError::Runtime(e) => {
                matches!(e.root_cause(), RuntimeErrorKind::Render(RenderError::Io(_)))
            }
            ExecutionError::Close(_) => false,
        };
        if io_failure {
            ExitCode::from(IO_ERROR)
        } else {
            ExitCode::from(DATA_ERROR)
        }
    }

    fn validated_program(&self) -> Result<polarplot::Program, ExitCode> {
        let program = self.parse_program().ok_or(ExitCode::from(DATA_ERROR))?;
        polarplot::validate(program)
            .map_err(|error| self.report_execution_error(&ExecutionError::Runtime(error)))
    }

    fn parse(&self) -> ExitCode {
        use polarplot::parser::formatter::{ProgramFormatter, SExpressionFormatter};

        match self.parse_program() {
            Some(program) => {
                print!("{}", SExpressionFormatter.format(&program));
                ExitCode::SUCCESS
            }
            None => ExitCode::from(DATA_ERROR),
        }
    }

    fn check(&self) -> ExitCode {
        match self.validated_program() {
            Ok(program) => {
                eprintln!("{}: {} statement(s) OK", self.name, program.len());
                ExitCode::SUCCESS
            }
            Err(code) => code,
        }
    }

    fn render(
        &self,
        format: &OutputFormat,
        output: Option<&Path>,
        options: SvgOptions,
        normalize: bool,
    ) -> ExitCode {
        let program = match self.validated_program() {
            Ok(program) => program,
            Err(code) => return code,
        };

        let writer: Box<dyn Write> = match output {
            Some(path) => match File::create(path) {
                Ok(file) => Box::new(BufWriter::new(file)),
                Err(error) => {
                    eprintln!("Can't create {path:?}: {error}");
                    return ExitCode::from(IO_ERROR);
                }
            },
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        };

        let target: Box<dyn RenderTarget> = match (format, normalize) {
            (OutputFormat::Vertex, false) => Box::new(VertexTarget::new(writer)),
            (OutputFormat::Vertex, true) => {
                Box::new(NormalizingTarget::new(VertexTarget::new(writer)))
            }
            (OutputFormat::Svg, _) => {
                Box::new(NormalizingTarget::new(SvgTarget::new(writer, options)))
            }
        };

        match polarplot::execute(&program, target) {
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => self.report_execution_error(&error),
        }
    }
}
