// Integration tests for running learner programs

use kidcode::{execute, translate, ExecutionLimits, Executor, FaultCategory};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn test_hello_tiger() {
    let result = execute("print('Hello, tiger!')");
    assert_eq!(result.captured_output, "Hello, tiger!\n");
    assert_eq!(result.failure, None);
}

#[test]
fn test_division_by_zero() {
    let result = execute("print(5/0)");
    assert_eq!(result.captured_output, "");

    let failure = result.failure.expect("division by zero should fail");
    assert_eq!(failure.category, FaultCategory::DivisionByZero);
    assert_eq!(failure.raw_message, "ZeroDivisionError: division by zero");
    assert_eq!(
        failure.translated_message,
        "Oops! You can't divide by zero - even computers can't do that! (ZeroDivisionError)"
    );
    assert_eq!(failure.line, Some(1));
}

#[test]
fn test_undefined_variable() {
    let result = execute("print(undefined_var)");
    assert_eq!(result.captured_output, "");

    let failure = result.failure.expect("undefined name should fail");
    assert_eq!(failure.category, FaultCategory::NameNotFound);
    assert_eq!(
        failure.raw_message,
        "NameError: name 'undefined_var' is not defined"
    );
    assert!(failure.translated_message.ends_with("(NameError)"));
}

#[test]
fn test_output_before_fault_is_kept() {
    let source = "print('one')\nprint('two')\nitems = [1, 2, 3]\nprint(items[10])\nprint('never')\n";
    let result = execute(source);
    assert_eq!(result.captured_output, "one\ntwo\n");

    let failure = result.failure.expect("index should fail");
    assert_eq!(failure.category, FaultCategory::IndexOutOfRange);
    assert_eq!(failure.line, Some(4));
}

#[test]
fn test_no_state_leaks_between_runs() {
    let first = execute("secret = 42\nprint(secret)\n");
    assert_eq!(first.captured_output, "42\n");

    let second = execute("print(secret)\n");
    assert_eq!(second.captured_output, "");
    assert_eq!(
        second.failure.map(|failure| failure.category),
        Some(FaultCategory::NameNotFound)
    );
}

#[test]
fn test_failed_run_does_not_affect_next_capture() {
    let failed = execute("print('partial')\nraise_it = 1 / 0\n");
    assert_eq!(failed.captured_output, "partial\n");

    let ok = execute("print('fresh')\n");
    assert_eq!(ok.captured_output, "fresh\n");
    assert!(ok.is_success());
}

#[test]
fn test_concurrent_runs_have_separate_output() {
    let executor = Executor::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let executor = &executor;
                scope.spawn(move || {
                    let source = format!("for n in range(3):\n    print({} * 10 + n)\n", i);
                    executor.execute(&source)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            let expected: String = (0..3).map(|n| format!("{}\n", i * 10 + n)).collect();
            assert_eq!(result.captured_output, expected);
        }
    });
}

#[test]
fn test_every_fault_becomes_data() {
    let programs = [
        ("print(\"unclosed", FaultCategory::SyntaxMalformed),
        ("if True:\nprint('x')\n", FaultCategory::IndentationMalformed),
        ("print('a' + 1)\n", FaultCategory::TypeMismatch),
        ("int('seven')\n", FaultCategory::InvalidValue),
        ("ages = {'ada': 9}\nprint(ages['bob'])\n", FaultCategory::KeyNotFound),
        ("'text'.shout()\n", FaultCategory::AttributeNotFound),
        ("open('diary.txt')\n", FaultCategory::FileNotFound),
        ("import turtle\n", FaultCategory::Other),
    ];

    for (source, category) in programs {
        let result = execute(source);
        let failure = result
            .failure
            .unwrap_or_else(|| panic!("expected {:?} to fail", source));
        assert_eq!(failure.category, category, "for {:?}", source);
        assert!(!failure.translated_message.is_empty());
    }
}

#[test]
fn test_translation_is_total() {
    for raw in ["", "???", "SomeBrandNewError: huh", "🐯", "KeyError: 'x'\nNameError"] {
        assert!(!translate(raw).is_empty(), "no message for {:?}", raw);
    }
    assert!(translate("mystery").contains("mystery"));
}

#[test]
fn test_step_budget_times_out() {
    let executor = Executor::new(ExecutionLimits::default().with_max_steps(5_000));
    let result = executor.execute("print('start')\nwhile True:\n    x = 1\n");

    assert_eq!(result.captured_output, "start\n");
    let failure = result.failure.unwrap();
    assert_eq!(failure.category, FaultCategory::Timeout);
    assert!(failure.translated_message.contains("ran for too long"));
}

#[test]
fn test_wall_clock_budget_times_out() {
    let executor = Executor::new(
        ExecutionLimits::default()
            .with_max_steps(u64::MAX)
            .with_time_limit(Duration::from_millis(100)),
    );
    let result = executor.execute("total = 0\nwhile True:\n    total += 1\n");
    assert_eq!(result.failure.unwrap().category, FaultCategory::Timeout);
    assert!(result.stats.elapsed >= Duration::from_millis(100));
}

#[test]
fn test_call_depth_budget() {
    let executor = Executor::new(ExecutionLimits::default().with_max_call_depth(50));
    let result = executor.execute("def down(n):\n    return down(n - 1)\n\ndown(10)\n");
    assert_eq!(result.failure.unwrap().exception, "RecursionError");

    // Shallow recursion stays within the budget
    let result = executor.execute(
        "def fact(n):\n    if n <= 1:\n        return 1\n    return n * fact(n - 1)\n\nprint(fact(10))\n",
    );
    assert_eq!(result.captured_output, "3628800\n");
}

#[test]
fn test_output_budget() {
    let executor = Executor::new(ExecutionLimits::default().with_max_output_bytes(100));
    let result = executor.execute("while True:\n    print('0123456789')\n");

    assert!(result.captured_output.len() <= 100);
    assert_eq!(result.failure.unwrap().exception, "MemoryError");
}

#[test]
fn test_sequence_budget() {
    let result = execute("huge = 'ab' * 100000000\nprint(len(huge))\n");
    assert_eq!(result.captured_output, "");
    assert_eq!(result.failure.unwrap().exception, "MemoryError");
}

#[test]
fn test_builtin_work_counts_against_time_budget() {
    let executor = Executor::new(
        ExecutionLimits::default()
            .with_max_steps(u64::MAX)
            .with_time_limit(Duration::from_millis(200)),
    );
    let result = executor.execute("for i in range(300):\n    s = sum(range(2000000))\nprint('done')\n");

    assert_eq!(result.captured_output, "");
    assert_eq!(result.failure.unwrap().category, FaultCategory::Timeout);
    assert!(result.stats.elapsed < Duration::from_secs(20));
}

#[test]
fn test_builtin_work_counts_against_step_budget() {
    let result = execute("print('start')\nbig = list(range(5000000))\n");
    assert_eq!(result.captured_output, "start\n");
    assert_eq!(result.failure.unwrap().exception, "TimeoutError");
}

#[test]
fn test_format_width_budget() {
    for source in [
        "s = '%99999999999999d' % 1\n",
        "s = '{:99999999999999}'.format(1)\n",
        "s = f'{1:99999999999999}'\n",
        "s = '{:.50000000f}'.format(1.0)\n",
    ] {
        let failure = execute(source).failure.unwrap();
        assert_eq!(failure.exception, "MemoryError", "for {:?}", source);
    }

    let failure = execute("s = '{:.100000f}'.format(1.0)\n").failure.unwrap();
    assert_eq!(
        failure.raw_message,
        "ValueError: Too many decimal digits in format string"
    );

    let result = execute("print(len('%5000d' % 1), len(f'{2:>300}'))\n");
    assert_eq!(result.captured_output, "5000 300\n");
}

#[test]
fn test_expression_depth_budget() {
    let source = format!("x = 1{}\n", " + 1".repeat(100_000));
    let failure = execute(&source).failure.unwrap();
    assert_eq!(failure.category, FaultCategory::SyntaxMalformed);
    assert!(failure.raw_message.contains("expression too complex"));

    let source = format!("print(1{})\n", " + 1".repeat(500));
    assert_eq!(execute(&source).captured_output, "501\n");
}

#[test]
fn test_nesting_budget() {
    let source = format!("x = {}1{}\n", "(".repeat(150), ")".repeat(150));
    let failure = execute(&source).failure.unwrap();
    assert_eq!(failure.category, FaultCategory::SyntaxMalformed);

    let source = format!("x = {}1{}\nprint(x)\n", "(".repeat(20), ")".repeat(20));
    assert_eq!(execute(&source).captured_output, "1\n");
}

#[test]
fn test_seeded_random_is_repeatable() {
    let executor = Executor::new(ExecutionLimits::default().with_random_seed(2024));
    let source = "import random\nprint(random.randint(1, 1000), random.choice(['a', 'b', 'c']))\n";

    let first = executor.execute(source);
    assert!(first.is_success());
    assert_eq!(executor.execute(source).captured_output, first.captured_output);
}

#[test]
fn test_teaching_subset() {
    let source = r#"
import math

scores = {'ada': 3, 'bob': 5}
for name, score in scores.items():
    print(f"{name}: {score}")

squares = [n * n for n in range(5) if n % 2 == 0]
print(squares, sum(squares))

def describe(word, times=2):
    return ' '.join([word.upper()] * times)

print(describe('hi'), describe('yo', times=3))
print(math.sqrt(16), 7 // 2, 7 % 3, 2 ** 10)
print(len("tiger"), "tiger"[::-1], round(3.14159, 2))
"#;
    let result = execute(source);
    assert_eq!(result.failure, None);
    assert_eq!(
        result.captured_output,
        "ada: 3\nbob: 5\n[0, 4, 16] 20\nHI HI YO YO YO\n4.0 3 1 1024\n5 regit 3.14\n"
    );
}
