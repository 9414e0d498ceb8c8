use streak_app::app::{run, AppConfig, Command, USAGE};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err:#}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    let config = AppConfig::from_env().unwrap_or_default();
    match run(&config, command) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(err) => {
            eprintln!("streak: {err:#}");
            std::process::exit(1);
        }
    }
}
