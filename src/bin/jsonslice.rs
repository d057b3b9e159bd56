fn main() {
    if let Err(e) = jsonslice::cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
