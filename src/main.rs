use std::io;
use std::process::ExitCode;

use primitive_db::cli::Cli;
use primitive_db::command::{run, run_once, Interpreter};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    let cli = Cli::parse_args();
    let mut interpreter = Interpreter::with_settings(cli.store(), cli.settings());

    if let Some(line) = &cli.command {
        // Non-interactive mode
        let succeeded = run_once(
            &mut interpreter,
            line,
            io::stdin().lock(),
            io::stdout().lock(),
            io::stderr().lock(),
        )?;
        return Ok(if succeeded {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut interpreter, stdin.lock(), stdout.lock())?;

    Ok(ExitCode::SUCCESS)
}
