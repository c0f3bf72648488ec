use time::macros::format_description;
use time::OffsetDateTime;

use crate::model::RepositoryRecord;

/// Format a timestamp as a YYYY-MM-DD string
pub fn format_date(when: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]");
    when.format(&format).unwrap_or_else(|_| "unknown".to_string())
}

/// One-line human summary of a crawl result
pub fn summarize(record: &RepositoryRecord) -> String {
    let failed = record
        .refs
        .iter()
        .flat_map(|r| &r.packages)
        .filter(|p| p.has_errors())
        .count();
    let mut line = format!(
        "{}: {} ({} refs, {} packages",
        record.full_name,
        record.status,
        record.refs.len(),
        record.package_count()
    );
    if failed > 0 {
        line.push_str(&format!(", {} with build errors", failed));
    }
    line.push_str(&format!(", last crawled {})", format_date(record.last_crawled)));
    line
}
