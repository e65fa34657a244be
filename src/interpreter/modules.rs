//! The importable modules: `math` and `random`
//!
//! A module is a [`Value::Module`]; its functions are [`Value::Builtin`]s whose
//! name is qualified with the module (`"math.sqrt"`), which is how
//! [`Interpreter::call_value`] routes them here.

use crate::interpreter::builtins::{expect_args, reject_kwargs, take_kwarg};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{RangeValue, Value};
use crate::parser::ast::SourceLocation;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::f64::consts;
use std::hash::{Hash, Hasher};

const MATH_FUNCTIONS: &[&str] = &[
    "math.ceil", "math.cos", "math.degrees", "math.exp", "math.fabs", "math.factorial",
    "math.floor", "math.gcd", "math.hypot", "math.log", "math.log10", "math.log2", "math.pow",
    "math.radians", "math.sin", "math.sqrt", "math.tan", "math.trunc",
];

const MATH_CONSTANTS: &[&str] = &["e", "inf", "nan", "pi", "tau"];

const RANDOM_FUNCTIONS: &[&str] = &[
    "random.choice", "random.randint", "random.random", "random.randrange", "random.sample",
    "random.seed", "random.shuffle", "random.uniform",
];

/// `import name`
pub(crate) fn import(name: &str, location: SourceLocation) -> Result<Value, RuntimeError> {
    match name {
        "math" => Ok(Value::Module("math")),
        "random" => Ok(Value::Module("random")),
        _ => Err(RuntimeError::ModuleNotFound {
            name: name.to_string(),
            location,
        }),
    }
}

fn functions(module: &str) -> &'static [&'static str] {
    match module {
        "math" => MATH_FUNCTIONS,
        "random" => RANDOM_FUNCTIONS,
        _ => &[],
    }
}

fn constant(module: &str, name: &str) -> Option<Value> {
    if module != "math" {
        return None;
    }
    let value = match name {
        "pi" => consts::PI,
        "e" => consts::E,
        "tau" => consts::TAU,
        "inf" => f64::INFINITY,
        "nan" => f64::NAN,
        _ => return None,
    };
    Some(Value::Float(value))
}

fn short_name(qualified: &str) -> &str {
    qualified.split_once('.').map_or(qualified, |(_, name)| name)
}

/// `module.name`
pub(crate) fn attribute(module: &str, name: &str) -> Option<Value> {
    constant(module, name).or_else(|| {
        functions(module)
            .iter()
            .copied()
            .find(|qualified| short_name(qualified) == name)
            .map(Value::Builtin)
    })
}

/// Everything `from module import *` binds
pub(crate) fn exports(module: &str) -> Vec<(&'static str, Value)> {
    let mut names = Vec::new();
    if module == "math" {
        for name in MATH_CONSTANTS {
            if let Some(value) = constant(module, name) {
                names.push((*name, value));
            }
        }
    }
    for &qualified in functions(module) {
        names.push((short_name(qualified), Value::Builtin(qualified)));
    }
    names
}

/// Call a module function by its qualified name
pub(crate) fn call(
    interp: &mut Interpreter,
    qualified: &str,
    args: Vec<Value>,
    mut kwargs: Vec<(String, Value)>,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let name = short_name(qualified);
    match qualified.split_once('.').map(|(module, _)| module) {
        Some("math") => {
            reject_kwargs(name, &kwargs, location)?;
            call_math(interp, name, &args, location)
        }
        Some("random") => {
            let mut args = args;
            if name == "sample" && args.len() == 1 {
                if let Some(k) = take_kwarg(&mut kwargs, "k") {
                    args.push(k);
                }
            }
            reject_kwargs(name, &kwargs, location)?;
            call_random(interp, name, &args, location)
        }
        _ => Err(RuntimeError::type_error(
            format!("'{}' object is not callable", qualified),
            location,
        )),
    }
}

fn domain_error(location: SourceLocation) -> RuntimeError {
    RuntimeError::value_error("math domain error", location)
}

fn range_error(location: SourceLocation) -> RuntimeError {
    RuntimeError::overflow("math range error", location)
}

fn call_math(
    interp: &mut Interpreter,
    name: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match name {
        "floor" | "ceil" | "trunc" => {
            expect_args(name, args, 1, 1, location)?;
            if let Some(n) = args[0].as_int() {
                return Ok(Value::Int(n));
            }
            let x = interp.expect_float(&args[0], location)?;
            let rounded = match name {
                "floor" => x.floor(),
                "ceil" => x.ceil(),
                _ => x.trunc(),
            };
            interp.to_int(&Value::Float(rounded), location)
        }

        "factorial" => {
            expect_args(name, args, 1, 1, location)?;
            let n = interp.expect_int(&args[0], location)?;
            if n < 0 {
                return Err(RuntimeError::value_error(
                    "factorial() not defined for negative values",
                    location,
                ));
            }
            let mut result: i64 = 1;
            for k in 2..=n {
                result = result.checked_mul(k).ok_or_else(|| {
                    RuntimeError::overflow("integer result is too large for this playground", location)
                })?;
            }
            Ok(Value::Int(result))
        }

        "gcd" => {
            let mut result: u64 = 0;
            for arg in args {
                let mut b = interp.expect_int(arg, location)?.unsigned_abs();
                let mut a = result;
                while b != 0 {
                    (a, b) = (b, a % b);
                }
                result = a;
            }
            i64::try_from(result).map(Value::Int).map_err(|_| {
                RuntimeError::overflow("integer result is too large for this playground", location)
            })
        }

        "hypot" => {
            let mut coords = Vec::with_capacity(args.len());
            for arg in args {
                coords.push(interp.expect_float(arg, location)?);
            }
            Ok(Value::Float(coords.iter().fold(0.0_f64, |acc, x| acc.hypot(*x))))
        }

        "log" => {
            expect_args(name, args, 1, 2, location)?;
            let x = interp.expect_float(&args[0], location)?;
            if x <= 0.0 {
                return Err(domain_error(location));
            }
            match args.get(1) {
                None => Ok(Value::Float(x.ln())),
                Some(base) => {
                    let base = interp.expect_float(base, location)?;
                    if base <= 0.0 {
                        return Err(domain_error(location));
                    }
                    if base == 1.0 {
                        return Err(RuntimeError::zero_division("float division by zero", location));
                    }
                    Ok(Value::Float(x.ln() / base.ln()))
                }
            }
        }

        "pow" => {
            expect_args(name, args, 2, 2, location)?;
            let x = interp.expect_float(&args[0], location)?;
            let y = interp.expect_float(&args[1], location)?;
            if (x == 0.0 && y < 0.0) || (x < 0.0 && y.is_finite() && y.fract() != 0.0) {
                return Err(domain_error(location));
            }
            let result = x.powf(y);
            if result.is_infinite() && x.is_finite() && y.is_finite() {
                return Err(range_error(location));
            }
            Ok(Value::Float(result))
        }

        _ => {
            expect_args(name, args, 1, 1, location)?;
            let x = interp.expect_float(&args[0], location)?;
            let result = match name {
                "sqrt" if x < 0.0 => return Err(domain_error(location)),
                "sqrt" => x.sqrt(),
                "fabs" => x.abs(),
                "sin" | "cos" | "tan" if x.is_infinite() => return Err(domain_error(location)),
                "sin" => x.sin(),
                "cos" => x.cos(),
                "tan" => x.tan(),
                "exp" => {
                    let result = x.exp();
                    if result.is_infinite() && x.is_finite() {
                        return Err(range_error(location));
                    }
                    result
                }
                "log2" | "log10" if x <= 0.0 => return Err(domain_error(location)),
                "log2" => x.log2(),
                "log10" => x.log10(),
                "radians" => x.to_radians(),
                "degrees" => x.to_degrees(),
                _ => {
                    return Err(RuntimeError::attribute_error(
                        format!("module 'math' has no attribute '{}'", name),
                        location,
                    ))
                }
            };
            Ok(Value::Float(result))
        }
    }
}

/// The items of a sequence argument to `choice` or `sample`
fn population(
    interp: &Interpreter,
    function: &str,
    value: &Value,
    location: SourceLocation,
) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(_) | Value::Tuple(_) | Value::Str(_) | Value::Range(_) => {
            interp.collect_iterable(value, location)
        }
        other => Err(RuntimeError::type_error(
            format!(
                "{}() needs a sequence, not '{}'",
                function,
                other.type_name()
            ),
            location,
        )),
    }
}

fn seeded_rng(seed: Option<&Value>, location: SourceLocation) -> Result<StdRng, RuntimeError> {
    let seed = match seed {
        None | Some(Value::None) => return Ok(StdRng::from_entropy()),
        Some(Value::Int(n)) => *n as u64,
        Some(Value::Bool(b)) => *b as u64,
        Some(Value::Float(f)) => f.to_bits(),
        Some(Value::Str(s)) => {
            let mut hasher = DefaultHasher::new();
            s.hash(&mut hasher);
            hasher.finish()
        }
        Some(other) => {
            return Err(RuntimeError::type_error(
                format!(
                    "seed must be None, int, float or str, not {}",
                    other.type_name()
                ),
                location,
            ))
        }
    };
    Ok(StdRng::seed_from_u64(seed))
}

fn call_random(
    interp: &mut Interpreter,
    name: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match name {
        "random" => {
            expect_args(name, args, 0, 0, location)?;
            Ok(Value::Float(interp.rng.gen::<f64>()))
        }

        "uniform" => {
            expect_args(name, args, 2, 2, location)?;
            let a = interp.expect_float(&args[0], location)?;
            let b = interp.expect_float(&args[1], location)?;
            Ok(Value::Float(a + (b - a) * interp.rng.gen::<f64>()))
        }

        "randint" => {
            expect_args(name, args, 2, 2, location)?;
            let a = interp.expect_int(&args[0], location)?;
            let b = interp.expect_int(&args[1], location)?;
            if a > b {
                return Err(RuntimeError::value_error(
                    format!("empty range in randint({}, {})", a, b),
                    location,
                ));
            }
            Ok(Value::Int(interp.rng.gen_range(a..=b)))
        }

        "randrange" => {
            expect_args(name, args, 1, 3, location)?;
            let mut bounds = Vec::with_capacity(args.len());
            for arg in args {
                bounds.push(interp.expect_int(arg, location)?);
            }
            let range = match bounds[..] {
                [stop] => RangeValue { start: 0, stop, step: 1 },
                [start, stop] => RangeValue { start, stop, step: 1 },
                [start, stop, step] => RangeValue { start, stop, step },
                _ => return Err(RuntimeError::type_error("randrange() expected at most 3 arguments", location)),
            };
            if range.step == 0 {
                return Err(RuntimeError::value_error("zero step for randrange()", location));
            }
            if range.is_empty() {
                return Err(RuntimeError::value_error(
                    format!("empty range in randrange({}, {})", range.start, range.stop),
                    location,
                ));
            }
            let index = interp.rng.gen_range(0..range.len());
            Ok(Value::Int(range.get(index)))
        }

        "choice" => {
            expect_args(name, args, 1, 1, location)?;
            let items = population(interp, name, &args[0], location)?;
            items
                .choose(&mut interp.rng)
                .cloned()
                .ok_or_else(|| RuntimeError::index_error("Cannot choose from an empty sequence", location))
        }

        "sample" => {
            expect_args(name, args, 2, 2, location)?;
            let items = population(interp, name, &args[0], location)?;
            let k = interp.expect_int(&args[1], location)?;
            let k = usize::try_from(k)
                .ok()
                .filter(|k| *k <= items.len())
                .ok_or_else(|| {
                    RuntimeError::value_error("Sample larger than population or is negative", location)
                })?;
            let picked = items.choose_multiple(&mut interp.rng, k).cloned().collect();
            Ok(Value::list(picked))
        }

        "shuffle" => {
            expect_args(name, args, 1, 1, location)?;
            let Value::List(list) = &args[0] else {
                return Err(RuntimeError::type_error(
                    format!("'{}' object does not support item assignment", args[0].type_name()),
                    location,
                ));
            };
            list.borrow_mut().shuffle(&mut interp.rng);
            Ok(Value::None)
        }

        "seed" => {
            expect_args(name, args, 0, 1, location)?;
            interp.rng = seeded_rng(args.first(), location)?;
            Ok(Value::None)
        }

        _ => Err(RuntimeError::attribute_error(
            format!("module 'random' has no attribute '{}'", name),
            location,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutionLimits;
    use crate::parser::parse_program;

    fn run_seeded(source: &str, seed: u64) -> Result<String, String> {
        let program = parse_program(source, 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default().with_random_seed(seed));
        match interp.run(&program) {
            Ok(()) => Ok(interp.into_output()),
            Err(err) => Err(err.raw_message()),
        }
    }

    fn run(source: &str) -> Result<String, String> {
        run_seeded(source, 7)
    }

    #[test]
    fn test_attribute_lookup() {
        assert!(matches!(attribute("math", "sqrt"), Some(Value::Builtin("math.sqrt"))));
        assert!(matches!(attribute("math", "pi"), Some(Value::Float(_))));
        assert!(attribute("math", "shuffle").is_none());
        assert!(attribute("random", "pi").is_none());
        assert_eq!(exports("random").len(), RANDOM_FUNCTIONS.len());
    }

    #[test]
    fn test_math_functions() {
        assert_eq!(
            run("import math\nprint(math.floor(3.7), math.ceil(3.2), math.factorial(5), math.gcd(12, 18))\n"),
            Ok("3 4 120 6\n".into())
        );
        assert_eq!(
            run("import math\nprint(math.hypot(3, 4), math.log2(8), math.pow(2, 3))\n"),
            Ok("5.0 3.0 8.0\n".into())
        );
        assert_eq!(run("import math\nmath.sqrt(-1)\n"), Err("ValueError: math domain error".into()));
        assert_eq!(
            run("from math import *\nprint(round(tau / pi), sqrt(9))\n"),
            Ok("2 3.0\n".into())
        );
    }

    #[test]
    fn test_random_stays_in_range() {
        let source = "import random\nok = True\nfor i in range(200):\n    n = random.randint(1, 6)\n    if n < 1 or n > 6:\n        ok = False\nprint(ok, random.choice(['x']), 0 <= random.random() < 1)\n";
        assert_eq!(run(source), Ok("True x True\n".into()));
    }

    #[test]
    fn test_random_is_reproducible_with_a_seed() {
        let source = "import random\nnums = list(range(10))\nrandom.shuffle(nums)\nprint(nums, random.randrange(0, 100, 5), random.sample('abcdef', 3))\n";
        assert_eq!(run_seeded(source, 42), run_seeded(source, 42));

        let reseeded = "import random\nrandom.seed(3)\na = random.random()\nrandom.seed(3)\nprint(a == random.random())\n";
        assert_eq!(run(reseeded), Ok("True\n".into()));
    }

    #[test]
    fn test_random_errors() {
        assert_eq!(
            run("import random\nrandom.choice([])\n"),
            Err("IndexError: Cannot choose from an empty sequence".into())
        );
        assert_eq!(
            run("import random\nrandom.sample([1, 2], 3)\n"),
            Err("ValueError: Sample larger than population or is negative".into())
        );
    }
}
