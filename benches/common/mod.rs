#![allow(dead_code)]
use std::path::Path;

use javamm::lexer::{self, Token};
use javamm::{Compiler, Program, SourceModule};
use test_support::bench_cases;

/// `(label, modules)` for every fixture case marked for benchmarking.
pub fn workloads() -> Vec<(String, Vec<SourceModule>)> {
    let cases = bench_cases(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench cases: {err:#}"));
    assert!(!cases.is_empty(), "no bench-enabled cases in tests/programs");
    cases
        .into_iter()
        .map(|case| {
            let modules = case
                .module_sources()
                .unwrap_or_else(|err| panic!("read {}: {err:#}", case.name))
                .iter()
                .map(|(name, text)| SourceModule::from_text(name, text))
                .collect();
            (case.name, modules)
        })
        .collect()
}

pub fn tokenize(module: &SourceModule) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut multi_line_comment = false;
    for line in module.lines() {
        let tokenized = lexer::tokenize(line, multi_line_comment)
            .unwrap_or_else(|err| panic!("tokenize {line}: {err}"));
        multi_line_comment = tokenized.multi_line_comment;
        tokens.extend(tokenized.tokens);
    }
    tokens
}

pub fn compile(modules: &[SourceModule]) -> Program {
    Compiler::new()
        .compile(modules)
        .unwrap_or_else(|err| panic!("compile: {err}"))
}
