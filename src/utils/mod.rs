pub fn format_ram_mb(ram_mb: u64) -> String {
    if ram_mb < 1024 { format!("{} MB", ram_mb) } else { format!("{:.1} GB", ram_mb as f64 / 1024.0) }
}

/// `m:ss`, as shown next to tracks in playlist listings.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_switches_to_gigabytes() {
        assert_eq!(format_ram_mb(512), "512 MB");
        assert_eq!(format_ram_mb(3072), "3.0 GB");
    }

    #[test]
    fn duration_pads_seconds() {
        assert_eq!(format_duration(224.0), "3:44");
        assert_eq!(format_duration(65.9), "1:05");
        assert_eq!(format_duration(-3.0), "0:00");
    }
}
