fn main() -> std::process::ExitCode {
    relay_viewer_lib::run()
}
