//! Mock spec runner binary for integration testing
//!
//! Speaks the same command line and report format as the real headless
//! spec runner, but instead of driving a browser it reads the scripts named
//! in the runner page and interprets a tiny subset of Jasmine:
//!
//! - `describe('name', function() {` opens a suite
//! - `it('name', function() {` opens a spec, `xit(` a pending one
//! - `expect(a).toEqual(b);` / `expect(a).toBe(b);` compare literals
//! - `throw ...` fails the enclosing spec, or is a script error outside one
//! - `console.log(...)` is echoed as a CONSOLE record
//! - a line starting with `});` closes the innermost block
//!
//! Exit code is 0 when everything passed, 1 on any failure or script error
//! and 2 on usage errors.

use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

struct Args {
    colors: bool,
    report: Option<PathBuf>,
    page: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut colors = false;
    let mut report = None;
    let mut page = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" => colors = true,
            "-r" => {
                report = Some(PathBuf::from(
                    args.next().ok_or("-r needs a report path")?,
                ))
            }
            _ if arg.starts_with('-') => return Err(format!("unknown flag {}", arg)),
            _ => page = Some(PathBuf::from(arg)),
        }
    }

    Ok(Args {
        colors,
        report,
        page: page.ok_or("usage: mock-specrunner [-c] [-r report] <runner.html>")?,
    })
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    colored::control::set_override(args.colors);

    let page = match std::fs::read_to_string(&args.page) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("cannot read {}: {}", args.page.display(), e);
            std::process::exit(2);
        }
    };

    let started = Instant::now();
    let mut run = Run::default();
    for script in script_sources(&page) {
        match std::fs::read_to_string(&script) {
            Ok(source) => run.interpret(&script, &source),
            Err(e) => {
                run.errors += 1;
                run.records
                    .push(format!("ERROR||cannot load {}: {}||{}:0", script, e, script));
            }
        }
    }
    let elapsed = started.elapsed().as_secs_f64();

    println!();
    let summary = format!(
        "{} tests, {} failures, {:.3} secs.",
        run.total, run.failures, elapsed
    );
    if run.failures > 0 || run.errors > 0 {
        println!("{}", summary.red());
    } else {
        println!("{}", summary.green());
    }

    if let Some(report) = &args.report {
        let mut content = run.records.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&format!(
            "TOTAL||{}||{}||{:.3}||{}\n",
            run.total,
            run.failures,
            elapsed,
            if run.pending > 0 { "T" } else { "F" }
        ));
        if let Err(e) = std::fs::write(report, content) {
            eprintln!("cannot write report {}: {}", report.display(), e);
            std::process::exit(2);
        }
    }

    std::process::exit(if run.failures > 0 || run.errors > 0 { 1 } else { 0 });
}

/// `src="..."` values of every script tag in the page
fn script_sources(page: &str) -> Vec<String> {
    page.lines()
        .filter(|line| line.contains("<script"))
        .filter_map(|line| {
            let start = line.find("src=\"")? + 5;
            let end = start + line[start..].find('"')?;
            Some(unescape(&line[start..end]))
        })
        .collect()
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

enum Block {
    Suite(String),
    Spec {
        name: String,
        line: usize,
        failed: bool,
        pending: bool,
    },
}

#[derive(Default)]
struct Run {
    total: usize,
    failures: usize,
    pending: usize,
    errors: usize,
    records: Vec<String>,
}

impl Run {
    fn interpret(&mut self, file: &str, source: &str) {
        let mut stack: Vec<Block> = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            let line_no = index + 1;
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some(name) = opener(line, "describe(") {
                stack.push(Block::Suite(name));
            } else if let Some((name, pending)) =
                opener(line, "it(").map(|n| (n, false)).or_else(|| opener(line, "xit(").map(|n| (n, true)))
            {
                stack.push(Block::Spec {
                    name,
                    line: line_no,
                    failed: false,
                    pending,
                });
                if line.ends_with("});") {
                    self.close(file, &mut stack);
                }
            } else if line.starts_with("});") {
                self.close(file, &mut stack);
            } else if line.starts_with("throw ") {
                match stack.last_mut() {
                    Some(Block::Spec { failed, .. }) => *failed = true,
                    _ => {
                        self.errors += 1;
                        self.records.push(format!(
                            "ERROR||{}||{}:{}",
                            line.trim_end_matches(';'),
                            file,
                            line_no
                        ));
                        print!("{}", "E".red());
                    }
                }
            } else if let Some(rest) = line.strip_prefix("console.log(") {
                let text = rest.trim_end_matches(';').trim_end_matches(')');
                self.records.push(format!("CONSOLE||{}", text));
            } else if let Some(passed) = expectation(line) {
                if let Some(Block::Spec { failed, .. }) = stack.last_mut() {
                    *failed |= !passed;
                }
            }
        }

        while !stack.is_empty() {
            self.close(file, &mut stack);
        }
        let _ = std::io::stdout().flush();
    }

    fn close(&mut self, file: &str, stack: &mut Vec<Block>) {
        let Some(Block::Spec {
            name,
            line,
            failed,
            pending,
        }) = stack.pop()
        else {
            return;
        };

        let mut labels: Vec<&str> = stack
            .iter()
            .filter_map(|block| match block {
                Block::Suite(name) => Some(name.as_str()),
                Block::Spec { .. } => None,
            })
            .collect();
        labels.push(&name);
        let labels = labels.join("||");

        if pending {
            self.pending += 1;
            self.records.push(format!("PENDING||{}", labels));
            print!("{}", "*".yellow());
            return;
        }

        self.total += 1;
        if failed {
            self.failures += 1;
            self.records.push(format!("FAIL||{}||{}:{}", labels, file, line));
            print!("{}", "F".red());
        } else {
            self.records.push(format!("PASS||{}||{}:{}", labels, file, line));
            print!("{}", ".".green());
        }
    }
}

/// Name of a `keyword('name', ...` block opener
fn opener(line: &str, keyword: &str) -> Option<String> {
    let rest = line.strip_prefix(keyword)?;
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

/// Outcome of an `expect(a).toEqual(b)` line, if it is one
fn expectation(line: &str) -> Option<bool> {
    let rest = line.strip_prefix("expect(")?;
    let (actual, rest) = rest.split_once(").")?;
    let expected = rest
        .strip_prefix("toEqual(")
        .or_else(|| rest.strip_prefix("toBe("))?;
    let expected = expected.trim_end_matches(';').strip_suffix(')')?;
    Some(actual.trim() == expected.trim())
}
