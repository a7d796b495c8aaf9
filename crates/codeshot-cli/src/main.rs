mod args;
mod config;
mod io;
mod parse;
mod run;

fn main() {
    init_logging();
    if let Err(err) = run::run() {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}

/// `CODESHOT_LOG` takes precedence over `RUST_LOG`; both default to `warn`.
fn init_logging() {
    let env = if std::env::var_os("CODESHOT_LOG").is_some() {
        env_logger::Env::new().filter_or("CODESHOT_LOG", "warn")
    } else {
        env_logger::Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();
}
