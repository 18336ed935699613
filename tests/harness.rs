use std::path::Path;

use anyhow::{Context, Result, ensure};

use javamm::{Config, Javamm, Program, RunResult, SourceModule, SyntaxError};
use test_support::{Case, CaseClass, load_cases, normalize_output};

struct RunOutput {
    result: RunResult,
    stdout: String,
    stderr: String,
}

fn config_for(case: &Case) -> Result<Config> {
    match &case.spec.config {
        Some(value) => serde_yaml::from_value(value.clone())
            .with_context(|| format!("Parsing config of {}", case.name)),
        None => Ok(Config::default()),
    }
}

fn compile_case(javamm: &Javamm, case: &Case) -> Result<std::result::Result<Program, SyntaxError>> {
    let modules = case
        .module_sources()?
        .iter()
        .map(|(name, text)| SourceModule::from_text(name, text))
        .collect::<Vec<_>>();
    Ok(javamm.compile(&modules))
}

fn run_case(javamm: &Javamm, case: &Case, program: &Program) -> Result<RunOutput> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = javamm
        .interpreter()
        .run(
            program,
            case.spec.arguments.clone(),
            &mut stdout,
            &mut stderr,
        )
        .with_context(|| format!("Running {}", case.name))?;
    Ok(RunOutput {
        result,
        stdout: String::from_utf8(stdout).context("Program output is not UTF-8")?,
        stderr: String::from_utf8(stderr).context("Error output is not UTF-8")?,
    })
}

fn expected_error(case: &Case) -> Result<String> {
    let expected_file = case
        .spec
        .expected
        .stderr_expectation()
        .with_context(|| format!("Missing stderr expectation file in {}", case.name))?;
    Ok(case.read_text(expected_file)?.trim().to_string())
}

fn check_stdout(case: &Case, actual: &str) -> Result<()> {
    let Some(stdout_file) = case.spec.expected.stdout_file.as_deref() else {
        return Ok(());
    };
    let expected = case.read_text(stdout_file)?;
    assert_eq!(
        normalize_output(actual),
        normalize_output(&expected),
        "Output mismatch for {}",
        case.name
    );
    Ok(())
}

fn check_case(case: &Case) -> Result<()> {
    if case.spec.bench.enabled {
        ensure!(
            !case.spec.bench.tags.is_empty(),
            "Case {} has bench enabled but no tags",
            case.name
        );
    }
    let javamm = Javamm::new(config_for(case)?);
    let compiled = compile_case(&javamm, case)?;

    match case.spec.class {
        CaseClass::RuntimeSuccess => {
            ensure!(
                case.spec.expected.exit_code == 0,
                "Case {} expected exit code must be 0 for runtime_success",
                case.name
            );
            let program = compiled.with_context(|| format!("Compiling {}", case.name))?;
            let output = run_case(&javamm, case, &program)?;
            ensure!(
                matches!(output.result, RunResult::Success(_)),
                "Expected success in {}, got {:?} with errors '{}'",
                case.name,
                output.result,
                output.stderr
            );
            check_stdout(case, &output.stdout)?;
        }
        CaseClass::FrontendError => {
            ensure!(
                case.spec.expected.exit_code == 1,
                "Case {} expected exit code must be 1 for frontend_error",
                case.name
            );
            let expected = expected_error(case)?;
            let Err(error) = compiled else {
                anyhow::bail!("Expected syntax error in {}, but compilation succeeded", case.name);
            };
            let actual = error.to_string();
            ensure!(
                actual.contains(&expected),
                "Expected syntax error containing '{expected}' in {}, got '{actual}'",
                case.name
            );
        }
        CaseClass::RuntimeError => {
            ensure!(
                case.spec.expected.exit_code == 1,
                "Case {} expected exit code must be 1 for runtime_error",
                case.name
            );
            let expected = expected_error(case)?;
            let program = compiled.with_context(|| format!("Compiling {}", case.name))?;
            let output = run_case(&javamm, case, &program)?;
            ensure!(
                matches!(output.result, RunResult::RuntimeFailure(_)),
                "Expected runtime error in {}, got {:?}",
                case.name,
                output.result
            );
            let actual = normalize_output(&output.stderr);
            if case.spec.expected.stderr_contains_file.is_some() {
                ensure!(
                    actual.contains(&expected),
                    "Expected runtime error containing '{expected}' in {}, got '{actual}'",
                    case.name
                );
            } else {
                assert_eq!(actual, expected, "Error report mismatch for {}", case.name);
            }
            check_stdout(case, &output.stdout)?;
        }
    }
    Ok(())
}

#[test]
fn runs_program_fixtures() -> Result<()> {
    let cases = load_cases(Path::new("tests/programs"))?;
    for case in &cases {
        check_case(case)?;
    }
    Ok(())
}
