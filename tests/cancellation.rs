use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use indoc::indoc;

use javamm::{Canceller, Config, Javamm, Program, RunResult, SourceModule};

const SPIN: &str = indoc! {"
    function main() {
        var ticks = 0;
        while (true) {
            ticks++;
        }
    }
"};

fn compile(javamm: &Javamm, source: &str) -> Program {
    javamm
        .compile(&[SourceModule::from_text("main", source)])
        .expect("compile failed")
}

#[test]
fn cancel_from_another_thread_terminates_a_running_program() {
    let javamm = Javamm::new(Config::default());
    let program = compile(&javamm, SPIN);
    let run = javamm.interpreter().prepare(&program, Vec::new());
    let canceller = run.canceller();
    let (done, finished) = mpsc::channel();

    let result = thread::scope(|scope| {
        scope.spawn(move || {
            // keep cancelling until the run reports back; the first call may
            // land before the loop is entered
            while finished.recv_timeout(Duration::from_millis(10)).is_err() {
                canceller.cancel();
            }
        });
        let mut output = Vec::new();
        let mut errors = Vec::new();
        let result = run.run(&mut output, &mut errors).expect("run failed");
        done.send(()).expect("canceller thread is alive");
        assert!(output.is_empty());
        assert!(errors.is_empty());
        result
    });

    assert_eq!(result, RunResult::Terminated);
}

/// Output sink that cancels the run once `limit` lines have been written.
struct CancellingSink {
    written: Vec<u8>,
    canceller: Canceller,
    limit: usize,
    lines: usize,
}

impl Write for CancellingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        self.lines += buf.iter().filter(|&&byte| byte == b'\n').count();
        if self.lines >= self.limit {
            self.canceller.cancel();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn nothing_is_printed_after_cancellation() {
    let javamm = Javamm::new(Config::default());
    let program = compile(
        &javamm,
        indoc! {"
            function main() {
                var i = 0;
                while (true) {
                    println(i);
                    i++;
                }
            }
        "},
    );
    let run = javamm.interpreter().prepare(&program, Vec::new());
    let mut output = CancellingSink {
        written: Vec::new(),
        canceller: run.canceller(),
        limit: 3,
        lines: 0,
    };
    let mut errors = Vec::new();

    let result = run.run(&mut output, &mut errors).expect("run failed");

    assert_eq!(result, RunResult::Terminated);
    assert_eq!(output.lines, 3);
    assert_eq!(String::from_utf8(output.written).expect("utf-8 output"), "0\n1\n2\n");
    assert!(errors.is_empty());
}

#[test]
fn cancellation_is_scoped_to_one_run() {
    let javamm = Javamm::new(Config::default());
    let program = compile(
        &javamm,
        indoc! {"
            function main() {
                println(\"done\");
            }
        "},
    );

    let first = javamm.interpreter().prepare(&program, Vec::new());
    let canceller: Canceller = first.canceller();
    let mut output = Vec::new();
    let mut errors = Vec::new();
    let result = first.run(&mut output, &mut errors).expect("first run failed");
    assert!(matches!(result, RunResult::Success(_)));

    canceller.cancel();
    canceller.cancel();
    assert!(canceller.is_cancelled());

    let mut output = Vec::new();
    let result = javamm
        .interpreter()
        .run(&program, Vec::new(), &mut output, &mut errors)
        .expect("second run failed");
    assert!(matches!(result, RunResult::Success(_)));
    assert_eq!(output, b"done\n");
}

#[test]
fn repeated_runs_of_one_program_are_independent() {
    let javamm = Javamm::new(Config::default());
    let program = compile(
        &javamm,
        indoc! {"
            function main() {
                var values = {3, 1, 2};
                values[0] = values[0] * 10;
                println(values);
                println(count(4));
            }
            function count(n) {
                return n == 0 ? 0 : 1 + count(n - 1);
            }
        "},
    );

    let outputs = (0..3)
        .map(|_| {
            let mut output = Vec::new();
            let mut errors = Vec::new();
            let result = javamm
                .interpreter()
                .run(&program, Vec::new(), &mut output, &mut errors)
                .expect("run failed");
            assert!(matches!(result, RunResult::Success(_)));
            String::from_utf8(output).expect("utf-8 output")
        })
        .collect::<Vec<_>>();

    assert!(outputs.iter().all(|output| output == "[30, 1, 2]\n4\n"));
}

#[test]
fn independent_runs_may_execute_concurrently() {
    let javamm = Javamm::new(Config {
        worker_stack_size: 8 * 1024 * 1024,
        ..Config::default()
    });
    let program = compile(
        &javamm,
        indoc! {"
            function main(args) {
                var total = 0;
                for (var i = 0; i < 1000; i++) {
                    total += i;
                }
                println(args[0] + total);
            }
        "},
    );

    let outputs = thread::scope(|scope| {
        let workers = ["a", "b", "c"]
            .into_iter()
            .map(|label| {
                let javamm = &javamm;
                let program = &program;
                scope.spawn(move || {
                    let mut output = Vec::new();
                    let mut errors = Vec::new();
                    javamm
                        .interpreter()
                        .run(program, vec![label.to_string()], &mut output, &mut errors)
                        .expect("run failed");
                    String::from_utf8(output).expect("utf-8 output")
                })
            })
            .collect::<Vec<_>>();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker panicked"))
            .collect::<Vec<_>>()
    });

    assert_eq!(outputs, vec!["a499500\n", "b499500\n", "c499500\n"]);
}
