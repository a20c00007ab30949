//! Build stamp for `xdmf-cli version`.
//!
//! `XDMF_BUILD_DATE` / `XDMF_BUILD_TIME` win when set. Otherwise the stamp
//! comes from `SOURCE_DATE_EPOCH` for reproducible builds, then the clock.

use time::OffsetDateTime;

fn build_instant() -> OffsetDateTime {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
}

fn stamp(var: &str, instant: OffsetDateTime, format: &str) -> String {
    if let Ok(value) = std::env::var(var) {
        return value;
    }
    time::format_description::parse(format)
        .ok()
        .and_then(|fmt| instant.format(&fmt).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let instant = build_instant();
    let date = stamp("XDMF_BUILD_DATE", instant, "[year]-[month]-[day]");
    let time = stamp("XDMF_BUILD_TIME", instant, "[hour]:[minute]:[second] UTC");

    for var in ["XDMF_BUILD_DATE", "XDMF_BUILD_TIME", "SOURCE_DATE_EPOCH"] {
        println!("cargo:rerun-if-env-changed={}", var);
    }
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rustc-env=XDMF_BUILD_DATE={}", date);
    println!("cargo:rustc-env=XDMF_BUILD_TIME={}", time);
}
