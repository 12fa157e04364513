//! helpers for logging.
//!
//! Library crates in this workspace only talk to the `log` facade.  Binaries, benchmarks and tests pick one of the
//! functions here to actually get output.

fn format_record(
    buf: &mut env_logger::fmt::Formatter,
    record: &log::Record<'_>,
) -> std::io::Result<()> {
    use std::io::Write;

    let now = time::OffsetDateTime::now_utc();

    writeln!(
        buf,
        "{} {} time={} target={}",
        record.level(),
        record.args(),
        now,
        record.target()
    )
}

/// Log to stderr.
///
/// Honors `RUST_LOG`.  If called multiple times in the same process, only applies once.
pub fn log_to_stderr() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        env_logger::builder().format(format_record).init();
    });
}

/// Set up logging for tests.
///
/// Output goes through the test harness's capture, so it only shows up for failing tests.  Safe to call from every
/// test; loggers after the first are silently dropped.
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .format(format_record)
        .try_init();
}
