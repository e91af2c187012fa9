use otlab_cli::{cli, logging};

fn main() {
    let matches = cli::command().get_matches();
    logging::init(cli::verbose(&matches));

    match cli::run(&matches) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
