fn main() {
    if let Err(err) = boxcull::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
