//! Turns source modules into an executable [`Program`].
//!
//! Pipeline per module: tokenize line by line (carrying `/* */` state), parse
//! the whole token stream, then check the combined function set. The first
//! problem found aborts compilation.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::lexer::{self, LexError};
use crate::parser;
use crate::program::{DeveloperFunction, FunctionSignature, Program};
use crate::source::{SourceLine, SourceModule};

pub mod error;
mod validation;

pub use error::{SemanticError, SyntaxError};
use validation::Validator;

const ENTRY_POINT: &str = "main";

#[derive(Debug, Default, Clone, Copy)]
pub struct Compiler;

impl Compiler {
    pub fn new() -> Self {
        Self
    }

    /// Compiles `modules` in order. Function signatures must be unique across
    /// all of them.
    pub fn compile(&self, modules: &[SourceModule]) -> Result<Program, SyntaxError> {
        let mut functions = FxHashMap::default();
        let mut declaration_order = Vec::new();

        for module in modules {
            let declared = self.compile_module(module)?;
            debug!(
                module = module.name(),
                lines = module.lines().len(),
                functions = declared.len(),
                "parsed module"
            );
            for function in declared {
                let signature = function.signature();
                if functions.contains_key(&signature) {
                    return Err(SyntaxError::new(
                        &function.source_line,
                        SemanticError::DuplicateFunction {
                            name: signature.name().to_string(),
                            arity: signature.arity(),
                        },
                    ));
                }
                let function = Arc::new(function);
                declaration_order.push(function.clone());
                functions.insert(signature, function);
            }
        }

        let mut validator = Validator::new(&functions);
        for function in &declaration_order {
            validator.validate(function)?;
        }

        let entry = [1, 0]
            .into_iter()
            .find_map(|arity| functions.get(&FunctionSignature::new(ENTRY_POINT, arity)))
            .cloned()
            .ok_or_else(|| {
                SyntaxError::new(&entry_error_line(modules), SemanticError::MissingEntryPoint)
            })?;

        info!(
            functions = functions.len(),
            entry = %entry.signature(),
            "compiled program"
        );
        Ok(Program::new(functions, entry))
    }

    fn compile_module(&self, module: &SourceModule) -> Result<Vec<DeveloperFunction>, SyntaxError> {
        let mut tokens = Vec::new();
        let mut multi_line_comment = false;
        for line in module.lines() {
            let tokenized = lexer::tokenize(line, multi_line_comment)
                .map_err(|error| SyntaxError::new(line, error))?;
            multi_line_comment = tokenized.multi_line_comment;
            tokens.extend(tokenized.tokens);
        }

        let last_line = module.last_line();
        if multi_line_comment {
            return Err(SyntaxError::new(&last_line, LexError::UnterminatedComment));
        }
        parser::parse_tokens(tokens, last_line)
    }
}

/// A missing entry point is not tied to any statement; it is reported on the
/// first line of the first module.
fn entry_error_line(modules: &[SourceModule]) -> SourceLine {
    match modules.first() {
        Some(module) => module
            .lines()
            .first()
            .cloned()
            .unwrap_or_else(|| module.last_line()),
        None => SourceLine::new("", 1, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn module(name: &str, source: &str) -> SourceModule {
        SourceModule::from_text(name, source)
    }

    fn compile(source: &str) -> Result<Program, SyntaxError> {
        Compiler::new().compile(&[module("main", source)])
    }

    fn compile_error(source: &str) -> String {
        compile(source).expect_err("expected syntax error").to_string()
    }

    #[test]
    fn compiles_functions_across_modules() {
        let library = module(
            "math",
            indoc! {"
                function square(x) {
                    return x * x;
                }
            "},
        );
        let main = module(
            "main",
            indoc! {"
                function main() {
                    println(square(3));
                }
            "},
        );
        let program = Compiler::new()
            .compile(&[library, main])
            .expect("compile failed");
        let signatures = program
            .signatures()
            .into_iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(signatures, vec!["main(0)", "square(1)"]);
        assert_eq!(program.entry().to_string(), "main(0)");
        let square = program
            .function(&FunctionSignature::new("square", 1))
            .expect("square is declared");
        assert_eq!(square.source_line.module(), "math");
    }

    #[test]
    fn prefers_main_with_arguments() {
        let program = compile(indoc! {"
            function main() {}
            function main(args) {}
        "})
        .expect("compile failed");
        assert_eq!(program.entry(), FunctionSignature::new("main", 1));
    }

    #[test]
    fn same_name_with_different_arity_is_allowed() {
        let program = compile(indoc! {"
            function f() { return 0; }
            function f(a) { return a; }
            function main() { println(f() + f(1)); }
        "})
        .expect("compile failed");
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn rejects_duplicate_signature_at_second_declaration() {
        let error = compile(indoc! {"
            function f(a) {}
            function main() {}
            function f(b) {}
        "})
        .expect_err("expected duplicate");
        assert_eq!(error.line(), 3);
        assert_eq!(
            error.message(),
            "Function 'f' with 1 parameter(s) is already defined"
        );

        let error = Compiler::new()
            .compile(&[
                module("a", "function main() {}"),
                module("b", "function main() {}"),
            ])
            .expect_err("expected duplicate across modules");
        assert_eq!(error.module(), "b");
    }

    #[test]
    fn rejects_undefined_function_calls() {
        let error = compile_error(indoc! {"
            function main() {
                var x = 1;
                x = helper(x, 2);
            }
            function helper(a) { return a; }
        "});
        assert_eq!(
            error,
            "Syntax error in 'main' [Line: 3]: Function 'helper' with 2 parameter(s) is not defined"
        );
    }

    #[test]
    fn rejects_break_and_continue_outside_loops() {
        let error = compile_error(indoc! {"
            function main() {
                if (true) {
                    break;
                }
            }
        "});
        assert_eq!(
            error,
            "Syntax error in 'main' [Line: 3]: 'break' is only allowed inside a loop"
        );
        assert!(compile_error("function main() { continue; }").contains("'continue'"));
        compile(indoc! {"
            function main() {
                for (;;) {
                    if (true) { break; } else { continue; }
                }
                do break; while (true);
            }
        "})
        .expect("loop bodies accept break and continue");
    }

    #[test]
    fn requires_an_entry_point() {
        let error = compile_error("function start() {}");
        assert_eq!(
            error,
            "Syntax error in 'main' [Line: 1]: Entry point is not defined: expected 'main()' or 'main(args)'"
        );
        assert!(compile_error("function main(a, b) {}").contains("Entry point"));
    }

    #[test]
    fn reports_lexical_errors_with_their_line() {
        let error = compile_error("function main() {\n  var s = \"open;\n}");
        assert_eq!(
            error,
            "Syntax error in 'main' [Line: 2]: String literal is not closed by '\"'"
        );
    }

    #[test]
    fn comments_may_span_lines_but_must_close() {
        compile(indoc! {"
            /* helper functions
               are declared below */
            function main() { /* inline */ println(1); } // trailing
        "})
        .expect("comments are skipped");

        let error = compile_error("function main() {}\n/* never\nclosed");
        assert_eq!(
            error,
            "Syntax error in 'main' [Line: 3]: Multi-line comment is not closed"
        );
    }

    #[test]
    fn compiling_twice_yields_equal_programs() {
        let source = indoc! {"
            function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }
            function main() { println(fib(10)); }
        "};
        assert_eq!(
            compile(source).expect("first compile"),
            compile(source).expect("second compile")
        );
    }
}
