use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    webshot::runner::run(std::env::args_os())
}
