use std::process::ExitCode;

fn main() -> ExitCode {
    match mmm_insights::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", err.kind());
            ExitCode::from(err.exit_code())
        }
    }
}
