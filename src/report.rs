//! HTML generation for both pipelines
//!
//! - [`generate_graph_page`]: adjacency list page served by the web surface
//! - [`generate_chart_report`]: static page wrapping the exported chart image

use std::io::{self, Write};

use crate::crosstab::CrossTab;
use crate::graph::{GroupedView, destination_label};

/// Default output HTML report name
pub const DEFAULT_HTML_FILE: &str = "tier_experience_report.html";

const GRAPH_PAGE_STYLE: &str = r#"        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 40px;
            background-color: #f4f7f6;
        }
        h1 {
            color: #2c3e50;
            border-bottom: 3px solid #3498db;
            padding-bottom: 15px;
            margin-bottom: 30px;
        }
        .graph-container { list-style: none; padding: 0; }
        .source-node {
            margin-bottom: 35px;
            display: flex;
            align-items: center;
            border: 1px solid #ddd;
            padding: 15px;
            background-color: #ffffff;
            border-radius: 8px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
        }
        .source-label {
            font-weight: bold;
            color: #ffffff;
            background-color: #e74c3c;
            padding: 10px 20px;
            border-radius: 6px;
            min-width: 120px;
            text-align: center;
        }
        .arrow-symbol { font-size: 2em; color: #3498db; margin: 0 20px; }
        .adj-list {
            list-style: none;
            padding: 0;
            margin-left: 30px;
            display: flex;
            flex-wrap: wrap;
            gap: 15px;
        }
        .neighbor-node { display: flex; align-items: center; }
        .dest-label {
            padding: 8px 15px;
            background-color: #ecf0f1;
            border-radius: 6px;
            border: 1px solid #bdc3c7;
        }
        .dest-label:hover { background-color: #dcdfe1; }
        .weight { font-weight: bold; color: #27ae60; margin-left: 5px; }
"#;

const CHART_REPORT_STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 40px; }
        h1 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
        img { border: 1px solid #ccc; max-width: 100%; height: auto; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
        p { color: #555; }
        table { border-collapse: collapse; margin-top: 30px; }
        th, td { border: 1px solid #ccc; padding: 6px 12px; text-align: right; }
        th { background-color: #ecf0f1; }
"#;

/// Write the adjacency list page for `view`
pub fn generate_graph_page<W: Write>(view: &GroupedView, writer: &mut W) -> io::Result<()> {
    write_head(writer, "Adjacency List", GRAPH_PAGE_STYLE)?;

    writeln!(writer, "<body>")?;
    writeln!(
        writer,
        "    <h1>Adjacency List (Pay Tier &rarr; Years of Experience)</h1>"
    )?;
    writeln!(writer, "    <ul class=\"graph-container\">")?;

    for group in &view.groups {
        writeln!(writer, "        <li class=\"source-node\">")?;
        writeln!(
            writer,
            "            <div class=\"source-label\">{}</div>",
            escape_html(&group.source)
        )?;
        writeln!(writer, "            <div class=\"arrow-symbol\">&rarr;</div>")?;
        writeln!(writer, "            <ul class=\"adj-list\">")?;
        for neighbor in &group.neighbors {
            writeln!(
                writer,
                "                <li class=\"neighbor-node\"><span class=\"dest-label\">{} (Count: <span class=\"weight\">{}</span>)</span></li>",
                escape_html(&neighbor.destination),
                neighbor.count
            )?;
        }
        writeln!(writer, "            </ul>")?;
        writeln!(writer, "        </li>")?;
    }

    writeln!(writer, "    </ul>")?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    Ok(())
}

/// Render the adjacency list page to a string
pub fn render_graph_page(view: &GroupedView) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail
    let _ = generate_graph_page(view, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write the static chart report referencing `image_src`
pub fn generate_chart_report<W: Write>(
    crosstab: &CrossTab,
    image_src: &str,
    writer: &mut W,
) -> io::Result<()> {
    write_head(writer, "Chart Report", CHART_REPORT_STYLE)?;

    let tiers = crosstab
        .rows()
        .iter()
        .map(|t| escape_html(t))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(writer, "<body>")?;
    writeln!(
        writer,
        "    <h1>Stacked Bar Chart: Experience Distribution by Pay Tier</h1>"
    )?;
    writeln!(
        writer,
        "    <p>Share of employees with each number of years of experience within each pay tier ({}), based on {} records.</p>",
        tiers,
        crosstab.record_count()
    )?;
    writeln!(
        writer,
        "    <img src=\"{}\" alt=\"Bar Chart - Tier vs Experience\"><br>",
        escape_html(image_src)
    )?;

    write_percentage_table(crosstab, writer)?;

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    Ok(())
}

/// Render the chart report to a string
pub fn render_chart_report(crosstab: &CrossTab, image_src: &str) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail
    let _ = generate_chart_report(crosstab, image_src, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_percentage_table<W: Write>(crosstab: &CrossTab, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "    <table>")?;
    write!(writer, "        <tr><th>Pay Tier</th>")?;
    for column in crosstab.columns() {
        write!(writer, "<th>{}</th>", escape_html(&destination_label(column)))?;
    }
    writeln!(writer, "</tr>")?;

    for (idx, tier) in crosstab.rows().iter().enumerate() {
        write!(writer, "        <tr><th>{}</th>", escape_html(tier))?;
        for pct in crosstab.row_percentages(idx).unwrap_or_default() {
            write!(writer, "<td>{:.1}%</td>", pct)?;
        }
        writeln!(writer, "</tr>")?;
    }

    writeln!(writer, "    </table>")?;
    Ok(())
}

fn write_head<W: Write>(writer: &mut W, title: &str, style: &str) -> io::Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html lang=\"en\">")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "    <meta charset=\"UTF-8\">")?;
    writeln!(writer, "    <title>{}</title>", escape_html(title))?;
    writeln!(writer, "    <style>")?;
    write!(writer, "{}", style)?;
    writeln!(writer, "    </style>")?;
    writeln!(writer, "</head>")?;
    Ok(())
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Neighbor, SourceGroup};

    fn sample_view() -> GroupedView {
        GroupedView {
            groups: vec![
                SourceGroup {
                    source: "Tier 1".to_string(),
                    neighbors: vec![
                        Neighbor {
                            destination: "2 years".to_string(),
                            count: 2,
                        },
                        Neighbor {
                            destination: "5 years".to_string(),
                            count: 1,
                        },
                    ],
                },
                SourceGroup {
                    source: "Tier 2".to_string(),
                    neighbors: vec![Neighbor {
                        destination: "2 years".to_string(),
                        count: 1,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_generate_graph_page() {
        let mut output = Vec::new();
        let result = generate_graph_page(&sample_view(), &mut output);
        assert!(result.is_ok());

        let html = String::from_utf8(output).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"source-label\">Tier 1</div>"));
        assert!(html.contains("2 years (Count: <span class=\"weight\">2</span>)"));
        assert!(html.contains("5 years (Count: <span class=\"weight\">1</span>)"));
        assert!(!html.contains("<script"));

        // Sorted order is preserved
        let first = html.find("2 years (Count: <span class=\"weight\">2").unwrap();
        let second = html.find("5 years").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_empty_view_renders_empty_container() {
        let html = render_graph_page(&GroupedView::default());
        assert!(html.contains("<ul class=\"graph-container\">\n    </ul>"));
        assert!(!html.contains("source-node\""));
    }

    #[test]
    fn test_labels_are_escaped() {
        let view = GroupedView {
            groups: vec![SourceGroup {
                source: "Tier <b>".to_string(),
                neighbors: vec![Neighbor {
                    destination: "\"x\" & y years".to_string(),
                    count: 1,
                }],
            }],
        };
        let html = render_graph_page(&view);
        assert!(html.contains("Tier &lt;b&gt;"));
        assert!(html.contains("&quot;x&quot; &amp; y years"));
    }

    #[test]
    fn test_generate_chart_report() {
        let crosstab = CrossTab::from_pairs(vec![
            ("1".to_string(), "2".to_string()),
            ("1".to_string(), "5".to_string()),
            ("2".to_string(), "2".to_string()),
        ]);

        let html = render_chart_report(&crosstab, "chart.png");
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("<img src=\"chart.png\""));
        assert!(html.contains("(1, 2)"));
        assert!(html.contains("<th>5 years</th>"));
        assert!(html.contains("<td>50.0%</td>"));
        assert!(html.contains("<td>100.0%</td><td>0.0%</td>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html("a<b>&'c'"), "a&lt;b&gt;&amp;&#39;c&#39;");
    }
}
