//! tally - Interactive console for a tally book.

fn main() -> std::process::ExitCode {
    tally::cmd::shell::main()
}
