use flexi_logger::{DeferredNow, Record, style};

/// `HH:MM:SS.mmm LEVEL message`, with the level colored.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(
        w,
        "{} {:<5} {}",
        now.format("%H:%M:%S%.3f"),
        style(level).paint(level.to_string()),
        record.args()
    )
}
