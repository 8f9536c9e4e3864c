fn main() -> std::process::ExitCode {
    emr_desk_lib::run()
}
