#[cfg(test)]
mod tidy;

use std::{env, process, time::Instant};

use xshell::{cmd, Shell};

const USAGE: &str = "\
cargo xtask [TASK]

Tasks:
  build   compile every crate and test target
  test    run the workspace tests
  demo    run the citeproc demo against a sample command line
  tidy    check that the published versions agree
  ci      all of the above (default)";

fn main() -> xshell::Result<()> {
    let task = env::args().nth(1);
    let sh = Shell::new()?;
    sh.change_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/.."));

    match task.as_deref() {
        None | Some("ci") => {
            let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
            cmd!(sh, "rustc --version").run()?;
            let steps: [fn(&Shell) -> xshell::Result<()>; 4] = [build, test, demo, tidy];
            for step in steps {
                step(&sh)?;
            }
        }
        Some("build") => build(&sh)?,
        Some("test") => test(&sh)?,
        Some("demo") => demo(&sh)?,
        Some("tidy") => tidy(&sh)?,
        Some(other) => {
            eprintln!("unknown task: `{other}`\n\n{USAGE}");
            process::exit(2);
        }
    }
    Ok(())
}

fn build(sh: &Shell) -> xshell::Result<()> {
    timed("build", || cmd!(sh, "cargo test --workspace --no-run").run())
}

fn test(sh: &Shell) -> xshell::Result<()> {
    timed("test", || cmd!(sh, "cargo test --workspace --exclude xtask").run())
}

/// Exercises the demo end to end: a style, a command and a stray input file.
fn demo(sh: &Shell) -> xshell::Result<()> {
    timed("demo", || {
        let out = cmd!(sh, "cargo run -q --example citeproc -- -s ieee list refs.bib").read()?;
        assert!(out.contains("refs.bib"), "unknown argument did not reach the demo:\n{out}");
        cmd!(sh, "cargo run -q --example citeproc -- --help").run()
    })
}

fn tidy(sh: &Shell) -> xshell::Result<()> {
    timed("tidy", || cmd!(sh, "cargo test -p xtask").run())
}

fn timed(name: &str, f: impl FnOnce() -> xshell::Result<()>) -> xshell::Result<()> {
    eprintln!("==> {name}");
    let start = Instant::now();
    let res = f();
    eprintln!("<== {name}: {:.2?}", start.elapsed());
    res
}
