use statement_ocr_to_table::TableRow;

const TABLE_HEADERS: [&str; 5] = ["Date", "Details", "Amount", "Interest Rate", "Balance"];

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Statement Table Extractor</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; background-color: #2c3e50; color: white; }
        .container { background-color: #34495e; padding: 20px; border-radius: 5px; text-align: center; }
        h1 { color: #fff; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f4f4f4; color: black; }
        .error { color: red; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Statement Table Extractor</h1>
        <form method="post" enctype="multipart/form-data">
            <label for="pdf_file_1">Upload PDF 1:</label>
            <input type="file" name="pdf_file_1" accept=".pdf" required>
            <label for="pdf_file_2">Upload PDF 2:</label>
            <input type="file" name="pdf_file_2" accept=".pdf">
            <label for="pdf_file_3">Upload PDF 3:</label>
            <input type="file" name="pdf_file_3" accept=".pdf">
            <button type="submit">Extract</button>
        </form>
"#;

const PAGE_FOOT: &str = r#"    </div>
</body>
</html>
"#;

/// Renders the full page: upload form, error list, and the parsed table when
/// any rows exist. Every dynamic value is escaped; OCR output is untrusted.
#[must_use]
pub fn render_page(rows: &[TableRow], errors: &[String]) -> String {
    let mut html = String::from(PAGE_HEAD);

    for error in errors {
        html.push_str("        <div class=\"error\">");
        html.push_str(&escape_html(error));
        html.push_str("</div>\n");
    }

    if !rows.is_empty() {
        html.push_str("        <table>\n            <tr>");
        for header in TABLE_HEADERS {
            html.push_str("<th>");
            html.push_str(header);
            html.push_str("</th>");
        }
        html.push_str("</tr>\n");

        for row in rows {
            html.push_str("            <tr>");
            for cell in [
                &row.date,
                &row.details,
                &row.amount,
                &row.interest_rate,
                &row.balance,
            ] {
                html.push_str("<td>");
                html.push_str(&escape_html(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>\n");
        }
        html.push_str("        </table>\n");
    }

    html.push_str(PAGE_FOOT);
    html
}

#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
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

#[cfg(test)]
mod tests {
    use super::{escape_html, render_page};
    use statement_ocr_to_table::TableRow;

    #[test]
    fn table_is_omitted_without_rows() {
        let html = render_page(&[], &[]);
        assert!(!html.contains("<table>"));
        assert!(html.contains("pdf_file_1"));
    }

    #[test]
    fn rows_are_rendered_in_column_order() {
        let row = TableRow {
            date: "20230115".to_string(),
            details: "SALARY".to_string(),
            amount: "5000.00".to_string(),
            interest_rate: "0.00".to_string(),
            balance: "5000.00".to_string(),
        };
        let html = render_page(std::slice::from_ref(&row), &[]);
        assert!(html.contains(
            "<td>20230115</td><td>SALARY</td><td>5000.00</td><td>0.00</td><td>5000.00</td>"
        ));
        assert!(html.contains("<th>Interest Rate</th>"));
    }

    #[test]
    fn untrusted_cells_are_escaped() {
        let row = TableRow {
            date: "20230115".to_string(),
            details: "<SCRIPT>".to_string(),
            amount: String::new(),
            interest_rate: String::new(),
            balance: String::new(),
        };
        let html = render_page(std::slice::from_ref(&row), &[]);
        assert!(html.contains("&lt;SCRIPT&gt;"));
        assert!(!html.contains("<SCRIPT>"));
    }

    #[test]
    fn error_messages_appear_in_error_divs() {
        let html = render_page(&[], &["bad \"upload\"".to_string()]);
        assert!(html.contains("<div class=\"error\">bad &quot;upload&quot;</div>"));
    }

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(escape_html("a&<>\"'z"), "a&amp;&lt;&gt;&quot;&#39;z");
    }
}
