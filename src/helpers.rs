use chrono::{DateTime, Utc};

pub fn human_bytes(b: i64) -> String {
    if b <= 0 {
        return "0 B".to_string();
    }
    const UNIT: i64 = 1024;
    if b < UNIT {
        return format!("{} B", b);
    }
    let suffixes = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = b / UNIT;
    while n >= UNIT && exp < suffixes.len() - 1 {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}", b as f64 / div as f64, suffixes[exp])
}

/// Usage as a whole percentage of capacity; empty when capacity is unknown.
pub fn usage_percent(used: i64, capacity: i64) -> String {
    if capacity <= 0 {
        return String::new();
    }
    let pct = (used.max(0) as f64 / capacity as f64 * 100.0).round() as i64;
    format!("{}%", pct.min(100))
}

pub fn human_time(t: Option<DateTime<Utc>>) -> String {
    let t = match t {
        Some(t) => t,
        None => return "never".to_string(),
    };

    let d = Utc::now() - t;
    let secs = d.num_seconds();

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        let m = d.num_minutes();
        if m == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", m)
        }
    } else if secs < 86400 {
        let h = d.num_hours();
        if h == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", h)
        }
    } else {
        let days = d.num_days();
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{} days ago", days)
        }
    }
}

pub fn human_duration_secs(total_secs: i64) -> String {
    if total_secs < 60 {
        format!("{}s", total_secs.max(0))
    } else if total_secs < 3600 {
        format!("{}m{}s", total_secs / 60, total_secs % 60)
    } else if total_secs < 86400 {
        format!("{}h{}m", total_secs / 3600, (total_secs % 3600) / 60)
    } else {
        let days = total_secs / 86400;
        let hours = (total_secs % 86400) / 3600;
        format!("{}d{}h", days, hours)
    }
}

/// Age of an RFC 3339 timestamp, e.g. a tenant's creation date.
pub fn parse_age(ts: &str) -> String {
    if ts.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => human_duration_secs((Utc::now() - dt.to_utc()).num_seconds()),
        Err(_) => String::new(),
    }
}

/// Age of a unix timestamp in seconds, as sent for pod creation times.
pub fn unix_age(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) if secs > 0 => human_duration_secs((Utc::now() - dt).num_seconds()),
        _ => String::new(),
    }
}
