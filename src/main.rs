#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This crate drives the page in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    showreel::frontend::run();
}
