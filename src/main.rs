fn main() {
    if let Err(err) = health_insights::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
