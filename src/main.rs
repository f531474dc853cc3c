fn main() -> std::process::ExitCode {
    genreq_lib::run()
}
