use crate::state::data_model::{self, Dataset};

/// Not a real spreadsheet binary: an HTML `<table>` document that Excel
/// opens through its HTML-import path, saved with an `.xls` extension.
pub fn to_excel_html(data: &Dataset) -> String {
    let headers = data_model::key_union(data);

    let mut out = String::new();
    out.push_str(
        "<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #f2f2f2; font-weight: bold; }\n\
         </style>\n</head>\n<body>\n<table>\n<thead>\n<tr>",
    );
    for header in &headers {
        out.push_str("<th>");
        out.push_str(&escape_html(header));
        out.push_str("</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in data {
        out.push_str("<tr>");
        for header in &headers {
            let cell = record
                .get(header)
                .map(data_model::display_value)
                .unwrap_or_default();
            out.push_str("<td>");
            out.push_str(&escape_html(&cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
