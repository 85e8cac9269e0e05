fn main() {
    rexgen::cli::run();
}
