// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{escape_html, Fragment, TABLE_CLASSES};

/// Default namespace of the delimited XML report documents.
pub const REPORT_NAMESPACE: &str = "http://asup_search.netapp.com/ns/T_VIF/1.0";
/// Namespace carrying the `ROW`/`list`/`li` structure elements.
pub const ASUP_NAMESPACE: &str = "http://asup_search.netapp.com/ns/ASUP/1.1";

/// Tags whose value is a doubly-nested list (`<tag><list><li>…`).
const NESTED_LIST_TAGS: [&str; 3] = ["services", "data_protocol", "failover_targets"];

/// Renders a delimited XML report (repeated `ROW` elements) as an HTML
/// table. Cell text is embedded verbatim; list-valued tags are flattened to
/// comma-joined strings.
pub fn render_xml_report(path: &Path) -> Fragment {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => return Fragment::Failure(format!("cannot read XML report: {err}")),
    };
    let doc = match roxmltree::Document::parse(&text) {
        Ok(doc) => doc,
        Err(err) => return Fragment::Failure(format!("cannot parse XML report: {err}")),
    };

    let mut columns = Vec::<String>::new();
    let mut rows = Vec::<HashMap<String, String>>::new();

    for row in doc
        .root_element()
        .children()
        .filter(|node| is_asup_element(node, "ROW"))
    {
        let mut cells = HashMap::new();
        for child in row.children().filter(|node| node.is_element()) {
            let tag = child.tag_name().name();
            let value = if tag == "list" {
                join_item_text(child.children().filter(|node| is_asup_element(node, "li")))
            } else if NESTED_LIST_TAGS.contains(&tag) {
                join_item_text(
                    child
                        .children()
                        .filter(|node| is_asup_element(node, "list"))
                        .flat_map(|list| {
                            list.children()
                                .filter(|node| is_asup_element(node, "li"))
                                .collect::<Vec<_>>()
                        }),
                )
            } else {
                child.text().map(str::trim).unwrap_or_default().to_owned()
            };

            if !columns.iter().any(|column| column == tag) {
                columns.push(tag.to_owned());
            }
            cells.insert(tag.to_owned(), value);
        }
        rows.push(cells);
    }

    Fragment::Content(render_table(&columns, &rows, false))
}

fn is_asup_element(node: &roxmltree::Node<'_, '_>, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace() == Some(ASUP_NAMESPACE)
}

fn join_item_text<'a, 'input, I>(items: I) -> String
where
    'input: 'a,
    I: IntoIterator<Item = roxmltree::Node<'a, 'input>>,
{
    items
        .into_iter()
        .filter_map(|item| item.text())
        .filter(|text| !text.is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a comma-delimited file with a header row as an HTML table.
/// Unlike the XML report, cell text is HTML-escaped.
pub fn render_csv_table(path: &Path) -> Fragment {
    match read_csv(path) {
        Ok((columns, rows)) => Fragment::Content(render_table(&columns, &rows, true)),
        Err(err) => Fragment::Failure(format!("cannot parse CSV file: {err}")),
    }
}

type CsvTable = (Vec<String>, Vec<HashMap<String, String>>);

fn read_csv(path: &Path) -> Result<CsvTable, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns = reader
        .headers()?
        .iter()
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            columns
                .iter()
                .cloned()
                .zip(record.iter().map(ToOwned::to_owned))
                .collect::<HashMap<_, _>>(),
        );
    }

    Ok((columns, rows))
}

fn render_table(columns: &[String], rows: &[HashMap<String, String>], escape_cells: bool) -> String {
    let mut html = String::new();
    html.push_str(&format!("<table class=\"{TABLE_CLASSES}\">\n"));

    html.push_str("<thead><tr>");
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows {
        html.push_str("<tr>");
        for column in columns {
            let value = row.get(column).map(String::as_str).unwrap_or_default();
            let cell = if escape_cells {
                escape_html(value)
            } else {
                value.to_owned()
            };
            html.push_str(&format!("<td>{cell}</td>"));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}
