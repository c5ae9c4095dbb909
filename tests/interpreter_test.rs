use color_eyre::eyre::Result;
use pretty_assertions::assert_eq;

use polarplot::interpreter::{
    context::{Context, RenderContext, ValidationContext},
    error::{ExecutionError, LoopRangeError, Phase, RuntimeError, RuntimeErrorKind},
    formatter::{BasicFormatter, PrettyFormatter, RuntimeErrorFormatter},
    registry::{dispatch, signatures},
    TreeWalkInterpreter,
};
use polarplot::render::{
    NormalizingTarget, RecordingTarget, RenderCommand, RenderError, RenderTarget, SvgOptions,
    SvgTarget, VertexTarget,
};
use polarplot::{execute, parse, validate};

fn validation_error(source: &str) -> Result<RuntimeError> {
    let program = parse(source)?;
    Ok(validate(program).unwrap_err())
}

fn vertex_output(source: &str) -> Result<String> {
    let program = validate(parse(source)?)?;
    let target = execute(&program, VertexTarget::new(Vec::new()))?;
    Ok(String::from_utf8(target.into_inner())?)
}

fn line_and_column(error: &RuntimeError) -> (u32, u32) {
    (error.position.line, error.position.column)
}

#[test]
fn products_bind_tighter_than_sums() -> Result<()> {
    let program = parse("x = 1 + 2 * 3\ny = (1 + 2) * 3")?;
    let context = TreeWalkInterpreter::new(ValidationContext::new()).run(&program)?;
    assert_eq!(context.value_of("x")?, 7.0);
    assert_eq!(context.value_of("y")?, 9.0);
    Ok(())
}

#[test]
fn natural_and_common_logarithms() -> Result<()> {
    let program = parse("a = log(e)\nb = log10(100)\nc = pow(2, 10) - max(3, min(4, 5))")?;
    let context = TreeWalkInterpreter::new(ValidationContext::new()).run(&program)?;
    assert!((context.value_of("a")? - 1.0).abs() < 1e-12);
    assert!((context.value_of("b")? - 2.0).abs() < 1e-12);
    assert_eq!(context.value_of("c")?, 1020.0);
    Ok(())
}

#[test]
fn loop_with_unit_step_renders_three_vertices() -> Result<()> {
    assert_eq!(
        vertex_output("for x over [0, 3) by 1 {\n  render(x, 0)\n}\n")?,
        "0.00000 0.00000\n0.00000 1.00000\n0.00000 2.00000\n"
    );
    Ok(())
}

#[test]
fn loop_without_step_uses_default() -> Result<()> {
    let output = vertex_output("for x over [0, 3) { render(x, 0) }")?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 300);
    assert_eq!(&lines[..3], &["0.00000 0.00000", "0.00000 0.01000", "0.00000 0.02000"]);
    assert_eq!(lines[299], "0.00000 2.99000");
    Ok(())
}

#[test]
fn mismatched_step_fails_before_the_body() -> Result<()> {
    let program = parse("for x over [1, 0] by 0.5 { render(x, 0) }")?;
    let mut recording = RecordingTarget::new();
    let error = execute(&program, &mut recording).unwrap_err();

    let ExecutionError::Runtime(error) = error else {
        panic!("Expected a runtime error.");
    };
    assert_eq!(error.phase, Phase::Loop);
    assert!(matches!(
        error.kind,
        RuntimeErrorKind::InvalidLoopRange(LoopRangeError::AscendingStepOnDescendingRange { .. })
    ));
    assert!(recording.commands().is_empty());
    assert_eq!(recording.times_closed(), 0);
    Ok(())
}

#[test]
fn zero_step_is_only_allowed_on_empty_ranges() -> Result<()> {
    let error = validation_error("for x over [0, 1) by 0 { render(x, 0) }")?;
    assert!(matches!(
        error.kind,
        RuntimeErrorKind::InvalidLoopRange(LoopRangeError::ZeroStep { .. })
    ));
    assert_eq!(error.code(), "RT004");

    assert_eq!(
        vertex_output("for x over [1, 1] by 0 { render(x, 0) }")?,
        "0.00000 1.00000\n"
    );
    Ok(())
}

#[test]
fn descending_step_on_ascending_range_fails() -> Result<()> {
    let error = validation_error("for x over [0, 1] by -1 { render(x, 0) }")?;
    assert!(matches!(
        error.kind,
        RuntimeErrorKind::InvalidLoopRange(LoopRangeError::DescendingStepOnAscendingRange { .. })
    ));
    Ok(())
}

#[test]
fn undefined_variable_reports_its_statement() -> Result<()> {
    let error = validation_error("q = 1\nz = x")?;
    assert_eq!(error.phase, Phase::Assignment);
    assert_eq!(line_and_column(&error), (2, 1));
    assert!(matches!(error.root_cause(), RuntimeErrorKind::UndefinedVariable(name) if name == "x"));
    assert_eq!(error.to_string(), "assignment error at line 2, column 1");
    assert_eq!(error.code(), "RT001");
    Ok(())
}

#[test]
fn assigning_to_a_constant_fails_validation() -> Result<()> {
    let error = validation_error("pi = 1")?;
    assert_eq!(error.phase, Phase::Assignment);
    assert_eq!(line_and_column(&error), (1, 1));
    assert!(matches!(error.kind, RuntimeErrorKind::IllegalAssignmentTarget(_)));
    assert_eq!(error.kind.to_string(), "3.14159 is not a variable");
    assert_eq!(error.code(), "RT005");
    Ok(())
}

#[test]
fn sink_never_stores() -> Result<()> {
    let error = validation_error("_ = 1\nx = _")?;
    assert!(matches!(error.root_cause(), RuntimeErrorKind::UndefinedVariable(name) if name == "_"));
    assert_eq!(line_and_column(&error), (2, 1));
    Ok(())
}

#[test]
fn unknown_function_is_a_call_error() -> Result<()> {
    let error = validation_error("x = 1\nspiral(x)")?;
    assert_eq!(error.phase, Phase::Call);
    assert!(matches!(error.kind, RuntimeErrorKind::NoSuchFunction(ref name) if name == "spiral"));
    assert_eq!(error.code(), "RT002");
    Ok(())
}

#[test]
fn wrong_arity_inside_an_expression() -> Result<()> {
    let error = validation_error("r = sin(1, 2)")?;
    assert!(matches!(
        error.kind,
        RuntimeErrorKind::WrongArity {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    assert_eq!(error.code(), "RT003");
    Ok(())
}

#[test]
fn every_builtin_checks_its_arity() -> Result<()> {
    let mut context = RenderContext::new(RecordingTarget::new());
    let mut count = 0;
    for (name, arity) in signatures() {
        count += 1;
        let exact = vec![0.5; arity];
        assert!(dispatch(&mut context, name, &exact).is_ok(), "{name} rejected {arity} args");

        for wrong in [arity - 1, arity + 1] {
            let arguments = vec![0.5; wrong];
            match dispatch(&mut context, name, &arguments) {
                Err(RuntimeErrorKind::WrongArity {
                    expected, actual, ..
                }) => {
                    assert_eq!((expected, actual), (arity, wrong), "{name}");
                }
                other => panic!("{name} accepted {wrong} args: {other:?}"),
            }
        }
    }
    assert_eq!(count, 23);
    Ok(())
}

#[test]
fn render_calls_emit_commands() -> Result<()> {
    let program = validate(parse("render(1, 2)\nrender_arc(0.5, 0, pi)")?)?;
    let recording = execute(&program, RecordingTarget::new())?;
    assert_eq!(
        recording.commands(),
        &[
            RenderCommand::Vertex { r: 1.0, theta: 2.0 },
            RenderCommand::Arc {
                r: 0.5,
                theta: 0.0,
                sweep: std::f64::consts::PI,
            },
        ]
    );
    assert_eq!(recording.times_closed(), 1);
    Ok(())
}

#[test]
fn validation_runs_each_loop_once() -> Result<()> {
    let program = parse("for x over [0, 1000000] by 0.001 { y = x }\nz = y")?;
    let context = TreeWalkInterpreter::new(ValidationContext::new()).run(&program)?;
    assert_eq!(context.value_of("y")?, 0.0);
    assert_eq!(context.environment().len(), 3);
    Ok(())
}

#[test]
fn validation_hands_back_the_same_program() -> Result<()> {
    let program = parse("for t over [0, 1) { render(t, t) }")?;
    let validated = validate(program.clone())?;
    assert_eq!(validated, program);
    Ok(())
}

#[test]
fn failed_execution_never_closes_the_target() -> Result<()> {
    let program = parse("for x over [0, 3) by 1 { render(x, 0) }\nspiral(1)")?;
    let mut recording = RecordingTarget::new();
    assert!(execute(&program, &mut recording).is_err());
    assert_eq!(recording.commands().len(), 3);
    assert_eq!(recording.times_closed(), 0);
    Ok(())
}

#[test]
fn svg_rejects_unnormalized_radius() -> Result<()> {
    let program = parse("render(2, 0)")?;
    let target = SvgTarget::new(Vec::new(), SvgOptions::default());
    let Err(ExecutionError::Runtime(error)) = execute(&program, target) else {
        panic!("Expected a runtime error.");
    };
    assert!(matches!(
        error.root_cause(),
        RuntimeErrorKind::Render(RenderError::UnnormalizedInput { .. })
    ));
    assert_eq!(error.code(), "RD002");
    Ok(())
}

#[test]
fn normalized_svg_accepts_large_radius() -> Result<()> {
    let program = parse("render(2, 0)\nrender(4, pi)")?;
    let target = NormalizingTarget::new(SvgTarget::new(Vec::new(), SvgOptions::default()));
    let output = String::from_utf8(execute(&program, target)?.into_inner().into_inner())?;
    assert!(output.starts_with("<html><body><svg height=\"800\" width=\"800\">"));
    assert!(output.contains("<polyline points=\"600.00000,400.00000 0.00000,400.00000\""));
    Ok(())
}

struct BrokenWriter;

impl std::io::Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("pipe closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("pipe closed"))
    }
}

#[test]
fn write_failure_while_closing() -> Result<()> {
    let program = parse("render(1, 0)")?;
    let target = NormalizingTarget::new(VertexTarget::new(BrokenWriter));
    let Err(error) = execute(&program, target) else {
        panic!("Expected the close to fail.");
    };
    assert!(matches!(error, ExecutionError::Close(RenderError::Io(_))));
    Ok(())
}

#[test]
fn nested_failures_keep_the_whole_chain() -> Result<()> {
    let error = validation_error("for a over [0, 1) { x = y }")?;
    assert_eq!(error.phase, Phase::Loop);
    assert_eq!(line_and_column(&error), (1, 1));
    assert_eq!(error.innermost().phase, Phase::Assignment);
    assert_eq!(line_and_column(error.innermost()), (1, 21));
    assert_eq!(
        BasicFormatter.format_error(&error),
        "loop error at line 1, column 1\n  \
         caused by: assignment error at line 1, column 21\n  \
         caused by: Undefined variable `y`"
    );
    Ok(())
}

#[test]
fn pretty_errors_carry_their_code() -> Result<()> {
    let source = "q = 1\nz = x";
    let error = validation_error(source)?;
    let report = PrettyFormatter::new(source, "plot.txt").format_error(&error);
    assert!(report.contains("RT001"));
    assert!(report.contains("plot.txt"));
    Ok(())
}

/// Forwards to `inner` and remembers what it accepted.
struct Tally<T: RenderTarget> {
    inner: T,
    accepted: Vec<RenderCommand>,
    closed: usize,
}

impl<T: RenderTarget> Tally<T> {
    fn new(inner: T) -> Self {
        Self {
            inner,
            accepted: Vec::new(),
            closed: 0,
        }
    }
}

impl<T: RenderTarget> RenderTarget for Tally<T> {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        self.inner.accept(command)?;
        self.accepted.push(command);
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.closed += 1;
        self.inner.close()
    }
}

#[test]
fn failing_body_stops_the_remaining_iterations() -> Result<()> {
    let program = parse("for x over [0, 3) by 1 { render(x / 1.5, 0)\n render(x, 1) }")?;
    let mut tally = Tally::new(SvgTarget::new(Vec::new(), SvgOptions::default()));
    let Err(ExecutionError::Runtime(error)) = execute(&program, &mut tally) else {
        panic!("Expected a runtime error.");
    };

    assert_eq!(error.phase, Phase::Loop);
    assert_eq!(line_and_column(&error), (1, 1));
    let RuntimeErrorKind::Statement(ref inner) = error.kind else {
        panic!("Expected the loop to wrap its body statement.");
    };
    assert_eq!(inner.phase, Phase::Call);
    assert_eq!(line_and_column(inner), (1, 26));
    assert!(matches!(
        inner.kind,
        RuntimeErrorKind::Render(RenderError::UnnormalizedInput { .. })
    ));

    assert_eq!(
        tally.accepted,
        vec![
            RenderCommand::Vertex { r: 0.0, theta: 0.0 },
            RenderCommand::Vertex { r: 0.0, theta: 1.0 },
            RenderCommand::Vertex {
                r: 1.0 / 1.5,
                theta: 0.0,
            },
            RenderCommand::Vertex { r: 1.0, theta: 1.0 },
        ]
    );
    assert_eq!(tally.closed, 0);
    Ok(())
}

#[test]
fn write_failures_are_reported_once_per_cause() -> Result<()> {
    let program = parse("render(1, 0)")?;
    let Err(error) = execute(&program, VertexTarget::new(BrokenWriter)) else {
        panic!("Expected the write to fail.");
    };
    assert_eq!(
        BasicFormatter.format_execution_error(&error),
        "call error at line 1, column 1\n  \
         caused by: Failed to write output\n  \
         caused by: pipe closed"
    );
    Ok(())
}

#[test]
fn loop_range_errors_are_reported_once() -> Result<()> {
    let error = validation_error("for x over [1, 0] by 0.5 { render(x, 0) }")?;
    assert_eq!(
        BasicFormatter.format_error(&error),
        "loop error at line 1, column 1\n  \
         caused by: Invalid loop range\n  \
         caused by: Step 0.5 is positive but the range descends from 1 to 0"
    );
    Ok(())
}
