use std::io::{BufReader, BufWriter, Write};
use std::process::ExitCode;

use proconio::source::once::OnceSource;

fn main() -> ExitCode {
    query_runner::logger::init();

    let stdin = std::io::stdin();
    let mut source = OnceSource::new(BufReader::new(stdin.lock()));
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = query_runner::run(&mut source, &mut out)
        .and_then(|()| out.flush().map_err(query_runner::Error::from));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("query_runner: {err}");
            ExitCode::FAILURE
        }
    }
}
