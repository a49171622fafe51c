mod viewer;

fn main() {
    if let Err(error) = viewer::run() {
        eprintln!("SpyGlass startup error: {error}");
    }
}
