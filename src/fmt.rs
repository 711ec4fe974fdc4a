use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;

fn timestamp_format() -> Option<&'static [FormatItem<'static>]> {
    static FMT: OnceLock<Option<Vec<FormatItem<'static>>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]",
        )
        .ok()
    })
    .as_deref()
}

/// Human-readable byte count: B below 1 KiB, then KB/MB/GB with one decimal.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const UNITS: [(u64, &str); 3] = [
        (KIB * KIB * KIB, "GB"),
        (KIB * KIB, "MB"),
        (KIB, "KB"),
    ];
    for (divider, unit) in UNITS {
        if bytes >= divider {
            let mut whole = bytes / divider;
            let mut tenths = ((bytes % divider) * 10 + divider / 2) / divider;
            if tenths == 10 {
                whole += 1;
                tenths = 0;
            }
            return format!("{}.{} {}", whole, tenths, unit);
        }
    }
    format!("{} B", bytes)
}

/// `YYYY-MM-DD HH:MM` in UTC for a millisecond Unix timestamp; out-of-range values print raw.
pub fn format_timestamp_ms(ms: i64) -> String {
    let nanos = i128::from(ms) * 1_000_000;
    timestamp_format()
        .zip(OffsetDateTime::from_unix_timestamp_nanos(nanos).ok())
        .and_then(|(fmt, t)| t.format(fmt).ok())
        .unwrap_or_else(|| ms.to_string())
}
