pub mod html;
pub mod types;

pub use types::ReportData;

use std::path::{Path, PathBuf};

/// File name for the report generated at unix time `id`
pub fn report_file_name(id: u64) -> String {
    format!("ravencode_frontend_test_report_{:010}.html", id)
}

/// Render and write the report, creating `dir` if needed
pub fn write_report(dir: &Path, id: u64, data: &ReportData<'_>) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(id));
    std::fs::write(&path, html::generate_html(data))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file_name_is_zero_padded() {
        assert_eq!(
            report_file_name(42),
            "ravencode_frontend_test_report_0000000042.html"
        );
        assert_eq!(
            report_file_name(1_700_000_000),
            "ravencode_frontend_test_report_1700000000.html"
        );
    }
}
