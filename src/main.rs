use std::process::ExitCode;

fn main() -> ExitCode {
    verity::cli::run()
}
