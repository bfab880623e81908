fn main() {
    scenarist::cli::run();
}
