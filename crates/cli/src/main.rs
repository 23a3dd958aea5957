use std::process::ExitCode;

fn main() -> ExitCode {
    cryptoprice_cli::run()
}
