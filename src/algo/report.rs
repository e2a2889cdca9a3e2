use super::handle::Handle;

/// Export formats for a list of handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `username,profile_url` with every cell quoted.
    #[default]
    Csv,
    /// One `@handle` per line, ready to paste.
    Mentions,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "mentions" | "list" => Some(Self::Mentions),
            _ => None,
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["csv", "mentions"]
    }
}

pub fn render(handles: &[Handle], format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => to_csv(handles),
        ExportFormat::Mentions => to_mentions(handles),
    }
}

/// Header plus one row per handle, rows joined by `\n`, no trailing newline.
pub fn to_csv(handles: &[Handle]) -> String {
    let mut rows = Vec::with_capacity(handles.len() + 1);
    rows.push("username,profile_url".to_string());
    rows.extend(
        handles
            .iter()
            .map(|h| format!("{},{}", csv_cell(h.as_str()), csv_cell(&h.profile_url()))),
    );
    rows.join("\n")
}

pub fn to_mentions(handles: &[Handle]) -> String {
    handles
        .iter()
        .map(|h| format!("@{h}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(names: &[&str]) -> Vec<Handle> {
        names.iter().filter_map(|n| Handle::parse(n)).collect()
    }

    #[test]
    fn csv_layout() {
        let csv = to_csv(&handles(&["amy", "zoe.k"]));
        assert_eq!(
            csv,
            "username,profile_url\n\
             \"amy\",\"https://instagram.com/amy\"\n\
             \"zoe.k\",\"https://instagram.com/zoe.k\""
        );
    }

    #[test]
    fn csv_empty_is_header_only() {
        assert_eq!(to_csv(&[]), "username,profile_url");
    }

    #[test]
    fn csv_cell_escapes_quotes() {
        assert_eq!(csv_cell(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn mention_list() {
        assert_eq!(to_mentions(&handles(&["amy", "bob"])), "@amy\n@bob");
        assert_eq!(to_mentions(&[]), "");
    }

    #[test]
    fn format_names() {
        assert_eq!(ExportFormat::from_str("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("mentions"), Some(ExportFormat::Mentions));
        assert_eq!(ExportFormat::from_str("xml"), None);
        assert_eq!(render(&handles(&["x"]), ExportFormat::Mentions), "@x");
    }
}
