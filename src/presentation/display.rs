use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::domain::file_walker::WalkStats;

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 输出单个查找结果
pub fn write_result<W: Write + ?Sized>(writer: &mut W, path: &Path) -> io::Result<()> {
    writeln!(writer, "{}", path.display())
}

/// 查找摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindSummary {
    pub duration: Duration,
    pub visited_entries: u64,
    pub matches: u64,
    pub skipped_errors: u64,
}

impl FindSummary {
    pub fn new(stats: WalkStats, duration: Duration) -> Self {
        Self {
            duration,
            visited_entries: stats.visited,
            matches: stats.matches,
            skipped_errors: stats.skipped,
        }
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "\n查找摘要:")?;
        writeln!(writer, "----------------------------")?;
        writeln!(writer, "总用时: {}", format_duration(self.duration))?;
        writeln!(writer, "访问条目: {}", self.visited_entries)?;
        writeln!(writer, "匹配项数: {}", self.matches)?;
        writeln!(writer, "跳过错误: {}", self.skipped_errors)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(2050)), "2.050s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }

    #[test]
    fn test_write_result() {
        let mut out = Vec::new();
        write_result(&mut out, Path::new("a/b.txt")).unwrap();
        write_result(&mut out, Path::new("c")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a/b.txt\nc\n");
    }

    #[test]
    fn test_summary_output() {
        let stats = WalkStats {
            visited: 7,
            matches: 2,
            skipped: 0,
        };
        let summary = FindSummary::new(stats, Duration::from_secs(1));

        let mut out = Vec::new();
        summary.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("访问条目: 7"));
        assert!(text.contains("匹配项数: 2"));
    }
}
