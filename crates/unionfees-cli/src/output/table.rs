use std::collections::BTreeMap;
use unionfees_core::model::Section;

/// Render sections as a plain text table, one block per section.
pub fn format_sections(sections: &BTreeMap<String, Section>) -> String {
    if sections.is_empty() {
        return "No sections found.\n".to_string();
    }

    let mut out = String::new();
    for section in sections.values() {
        out.push_str(&format!(
            "=== {} ({} row{}) ===\n",
            section.name,
            section.len(),
            if section.len() == 1 { "" } else { "s" }
        ));

        let name_width = section
            .rows
            .iter()
            .map(|r| r[0].chars().count())
            .max()
            .unwrap_or(0);
        for (cells, row) in section.rows.iter().zip(&section.row_indices) {
            out.push_str(&format!(
                "  {:>4}  {:<width$}  {:<13}  {:>10}  {}\n",
                row,
                cells[0],
                cells[1],
                cells[2],
                cells[3],
                width = name_width
            ));
        }
        out.push('\n');
    }
    out
}

pub fn print_sections(sections: &BTreeMap<String, Section>) {
    print!("{}", format_sections(sections));
}
